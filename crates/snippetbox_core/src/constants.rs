//! Shared constants used across SnippetBox crates.

/// Default API port.
pub const DEFAULT_PORT: u16 = 38412;

/// Default maximum snippet body size accepted by the API layer.
pub const DEFAULT_MAX_SNIPPET_SIZE: usize = 1024 * 1024;

/// Maximum snippet title length, in characters.
pub const MAX_TITLE_CHARS: usize = 200;
/// Maximum snippet description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 2000;
/// Maximum language or tag name length, in characters.
pub const MAX_NAME_CHARS: usize = 100;
/// Maximum username length, in characters.
pub const MAX_USERNAME_CHARS: usize = 64;

/// Lifetime of a bearer session, counted from login.
pub const SESSION_TTL_HOURS: i64 = 24 * 30;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";
