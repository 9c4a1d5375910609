//! Data models for SnippetBox.

/// Language and tag models.
pub mod catalog;
/// Snippet models and request payloads.
pub mod snippet;
/// User and session models.
pub mod user;

pub use catalog::{Language, LanguageRequest, Tag, TagRequest};
pub use snippet::{
    CreateSnippetRequest, NewSnippet, SearchQuery, Snippet, SnippetDetail, UpdateSnippetRequest,
};
pub use user::{LoginRequest, LoginResponse, Session, User};

/// Identifier of a [`User`].
pub type UserId = u64;
/// Identifier of a [`Snippet`].
pub type SnippetId = u64;
/// Identifier of a [`Language`].
pub type LanguageId = u64;
/// Identifier of a [`Tag`].
pub type TagId = u64;
