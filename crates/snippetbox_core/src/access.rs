//! Caller guards for mutating operations.

use crate::{models::Snippet, AppError, UserId};

/// Require an authenticated caller.
///
/// # Arguments
/// - `caller`: Resolved session user, if any.
///
/// # Returns
/// The caller's user id.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] when no caller is present.
pub fn require_caller(caller: Option<UserId>) -> Result<UserId, AppError> {
    caller.ok_or(AppError::Unauthorized)
}

/// Require `caller` to be the author of `snippet`.
///
/// # Errors
/// Returns [`AppError::Forbidden`] for any other caller.
pub fn ensure_author(snippet: &Snippet, caller: UserId) -> Result<(), AppError> {
    if snippet.author_id == caller {
        return Ok(());
    }
    tracing::warn!(
        "User {} attempted to modify snippet {} owned by {}",
        caller,
        snippet.id,
        snippet.author_id
    );
    Err(AppError::Forbidden(
        "Only the snippet author can modify it".to_string(),
    ))
}
