//! Profile HTTP handler.

use crate::{auth::Caller, error::HttpError, models::Snippet, AppState};
use axum::{extract::State, Json};
use snippetbox_core::ops;

/// Snippets the caller authored or collaborates on.
///
/// # Errors
/// Returns `401` without a session.
pub async fn user_profile(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Snippet>>, HttpError> {
    Ok(Json(ops::user_profile(&state.db, caller.user_id)?))
}
