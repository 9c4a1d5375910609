//! HTTP request handlers.

/// Language endpoints.
pub mod language;
/// Profile endpoint.
pub mod profile;
/// Login and logout endpoints.
pub mod session;
/// Snippet endpoints, including forks, collaborators, and search.
pub mod snippet;
/// Tag endpoints.
pub mod tag;
