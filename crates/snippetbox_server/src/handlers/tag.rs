//! Tag HTTP handlers.

use crate::extract::{ApiJson, ApiPath};
use crate::{auth::Caller, error::HttpError, models::*, AppState};
use axum::{extract::State, http::StatusCode, Json};
use snippetbox_core::ops;

/// List all tags.
///
/// # Errors
/// Returns an error if storage access fails.
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, HttpError> {
    Ok(Json(ops::list_tags(&state.db)?))
}

/// Fetch a tag by id.
///
/// # Errors
/// Returns `404` if the tag does not exist.
pub async fn detail_tag(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TagId>,
) -> Result<Json<Tag>, HttpError> {
    Ok(Json(ops::detail_tag(&state.db, id)?))
}

/// List the snippets carrying a tag.
///
/// # Errors
/// Returns `404` if the tag does not exist.
pub async fn tag_snippets(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TagId>,
) -> Result<Json<Vec<Snippet>>, HttpError> {
    Ok(Json(ops::tag_snippets(&state.db, id)?))
}

/// Create a tag.
///
/// # Errors
/// Returns `401` without a session or `400` for an invalid name.
pub async fn create_tag(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(req): ApiJson<TagRequest>,
) -> Result<(StatusCode, Json<Tag>), HttpError> {
    let tag = ops::create_tag(&state.db, caller.user_id, &req)?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Rename a tag.
///
/// # Errors
/// Returns `401`, `404`, or `400`.
pub async fn edit_tag(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<TagId>,
    ApiJson(req): ApiJson<TagRequest>,
) -> Result<Json<Tag>, HttpError> {
    Ok(Json(ops::edit_tag(&state.db, caller.user_id, id, &req)?))
}

/// Delete a tag.
///
/// # Errors
/// Returns `401` or `404`.
pub async fn delete_tag(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<TagId>,
) -> Result<StatusCode, HttpError> {
    ops::delete_tag(&state.db, caller.user_id, id)?;
    Ok(StatusCode::NO_CONTENT)
}
