//! redb table definitions shared by storage modules.

use redb::{MultimapTableDefinition, TableDefinition};

/// Canonical snippet rows (`Snippet`, bincode-encoded).
pub const SNIPPETS: TableDefinition<u64, &[u8]> = TableDefinition::new("snippets");
/// Language rows (`Language`, bincode-encoded).
pub const LANGUAGES: TableDefinition<u64, &[u8]> = TableDefinition::new("languages");
/// Tag rows (`Tag`, bincode-encoded).
pub const TAGS: TableDefinition<u64, &[u8]> = TableDefinition::new("tags");
/// User rows (`User`, bincode-encoded).
pub const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");
/// Unique username index.
pub const USERS_BY_NAME: TableDefinition<&str, u64> = TableDefinition::new("users_by_name");
/// Session rows keyed by bearer token (`Session`, bincode-encoded).
pub const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");
/// Last allocated id per entity kind.
pub const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

/// Collaborator set: snippet id -> user ids.
pub const SNIPPET_USERS: MultimapTableDefinition<u64, u64> =
    MultimapTableDefinition::new("snippet_users");
/// Reverse collaborator index: user id -> snippet ids.
pub const USER_SNIPPETS: MultimapTableDefinition<u64, u64> =
    MultimapTableDefinition::new("user_snippets");
/// Tag set: snippet id -> tag ids.
pub const SNIPPET_TAGS: MultimapTableDefinition<u64, u64> =
    MultimapTableDefinition::new("snippet_tags");
/// Reverse tag index: tag id -> snippet ids.
pub const TAG_SNIPPETS: MultimapTableDefinition<u64, u64> =
    MultimapTableDefinition::new("tag_snippets");
/// Fork index: parent snippet id -> fork snippet ids.
pub const SNIPPET_FORKS: MultimapTableDefinition<u64, u64> =
    MultimapTableDefinition::new("snippet_forks");
/// Language usage index: language id -> snippet ids.
pub const LANGUAGE_SNIPPETS: MultimapTableDefinition<u64, u64> =
    MultimapTableDefinition::new("language_snippets");

/// Sequence keys.
pub(crate) const SEQ_SNIPPET: &str = "snippet";
pub(crate) const SEQ_LANGUAGE: &str = "language";
pub(crate) const SEQ_TAG: &str = "tag";
pub(crate) const SEQ_USER: &str = "user";
