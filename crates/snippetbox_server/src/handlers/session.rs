//! Session HTTP handlers.

use crate::extract::ApiJson;
use crate::{auth::Caller, error::HttpError, models::*, AppError, AppState};
use axum::{extract::State, http::StatusCode, Json};
use snippetbox_core::ops;

/// Open a session for a username.
///
/// # Returns
/// `201 Created` with the bearer token and user.
///
/// # Errors
/// Returns `400` for a malformed username.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), HttpError> {
    Ok((StatusCode::CREATED, Json(ops::login(&state.db, &req)?)))
}

/// Revoke the caller's session.
///
/// # Errors
/// Returns `401` without a session.
pub async fn logout(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<StatusCode, HttpError> {
    let token = caller.token.ok_or(AppError::Unauthorized)?;
    ops::logout(&state.db, caller.user_id, &token)?;
    Ok(StatusCode::NO_CONTENT)
}
