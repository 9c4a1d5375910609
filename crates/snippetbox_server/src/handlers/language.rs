//! Language HTTP handlers.

use crate::extract::{ApiJson, ApiPath};
use crate::{auth::Caller, error::HttpError, models::*, AppState};
use axum::{extract::State, http::StatusCode, Json};
use snippetbox_core::ops;

/// List all languages.
///
/// # Errors
/// Returns an error if storage access fails.
pub async fn list_languages(
    State(state): State<AppState>,
) -> Result<Json<Vec<Language>>, HttpError> {
    Ok(Json(ops::list_languages(&state.db)?))
}

/// Fetch a language by id.
///
/// # Errors
/// Returns `404` if the language does not exist.
pub async fn detail_language(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<LanguageId>,
) -> Result<Json<Language>, HttpError> {
    Ok(Json(ops::detail_language(&state.db, id)?))
}

/// Create a language.
///
/// # Errors
/// Returns `401` without a session or `400` for an invalid name.
pub async fn create_language(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(req): ApiJson<LanguageRequest>,
) -> Result<(StatusCode, Json<Language>), HttpError> {
    let language = ops::create_language(&state.db, caller.user_id, &req)?;
    Ok((StatusCode::CREATED, Json(language)))
}

/// Rename a language.
///
/// # Errors
/// Returns `401`, `404`, or `400`.
pub async fn edit_language(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<LanguageId>,
    ApiJson(req): ApiJson<LanguageRequest>,
) -> Result<Json<Language>, HttpError> {
    let language = ops::edit_language(&state.db, caller.user_id, id, &req)?;
    Ok(Json(language))
}

/// Delete a language.
///
/// # Errors
/// Returns `401` or `404`.
pub async fn delete_language(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<LanguageId>,
) -> Result<StatusCode, HttpError> {
    ops::delete_language(&state.db, caller.user_id, id)?;
    Ok(StatusCode::NO_CONTENT)
}
