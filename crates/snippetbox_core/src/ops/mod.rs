//! Snippet, catalog, and session operations with caller guards applied.
//!
//! Every mutating operation takes the resolved caller as `Option<UserId>` and
//! checks it before touching storage, so an anonymous request always fails
//! with [`crate::AppError::Unauthorized`] regardless of whether the target
//! exists.

/// Language and tag operations.
pub mod catalog;
/// Login and logout.
pub mod session;
/// Snippet operations, including forks and collaborators.
pub mod snippet;
mod validate;

pub use catalog::*;
pub use session::{login, logout};
pub use snippet::*;
