//! Snippet HTTP handlers.

use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::{auth::Caller, error::HttpError, models::*, AppError, AppState};
use axum::{extract::State, http::StatusCode, Json};
use snippetbox_core::ops;

fn check_body_size(state: &AppState, body: &str) -> Result<(), HttpError> {
    if body.len() > state.config.max_snippet_size {
        return Err(AppError::Validation(format!(
            "Snippet body exceeds maximum of {} bytes",
            state.config.max_snippet_size
        ))
        .into());
    }
    Ok(())
}

/// List all snippets.
///
/// # Errors
/// Returns an error if storage access fails.
pub async fn list_snippets(State(state): State<AppState>) -> Result<Json<Vec<Snippet>>, HttpError> {
    Ok(Json(ops::list_snippets(&state.db)?))
}

/// Fetch a snippet with its relations.
///
/// # Arguments
/// - `state`: Application state.
/// - `id`: Snippet identifier from the path.
///
/// # Returns
/// The snippet detail as JSON.
///
/// # Errors
/// Returns `404` if the snippet does not exist.
pub async fn detail_snippet(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SnippetId>,
) -> Result<Json<SnippetDetail>, HttpError> {
    Ok(Json(ops::detail_snippet(&state.db, id)?))
}

/// Create a snippet authored by the caller.
///
/// # Arguments
/// - `state`: Application state.
/// - `caller`: Resolved session caller.
/// - `req`: Snippet creation payload.
///
/// # Returns
/// `201 Created` with the stored snippet.
///
/// # Errors
/// Returns `401` without a session, `400` for invalid fields.
pub async fn create_snippet(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(req): ApiJson<CreateSnippetRequest>,
) -> Result<(StatusCode, Json<Snippet>), HttpError> {
    check_body_size(&state, &req.body)?;
    let snippet = ops::create_snippet(&state.db, caller.user_id, req)?;
    Ok((StatusCode::CREATED, Json(snippet)))
}

/// Apply a partial update to a snippet owned by the caller.
///
/// # Errors
/// Returns `401`, `404`, `403`, or `400` per the caller guards and validation.
pub async fn edit_snippet(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<SnippetId>,
    ApiJson(req): ApiJson<UpdateSnippetRequest>,
) -> Result<Json<Snippet>, HttpError> {
    if let Some(body) = req.body.as_deref() {
        check_body_size(&state, body)?;
    }
    Ok(Json(ops::edit_snippet(&state.db, caller.user_id, id, req)?))
}

/// Delete a snippet owned by the caller.
///
/// # Returns
/// `204 No Content` on success.
///
/// # Errors
/// Returns `401`, `404`, or `403` per the caller guards.
pub async fn delete_snippet(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<SnippetId>,
) -> Result<StatusCode, HttpError> {
    ops::delete_snippet(&state.db, caller.user_id, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fork a snippet into a new one authored by the caller.
///
/// # Returns
/// `201 Created` with the fork.
///
/// # Errors
/// Returns `401` without a session or `404` for a missing source.
pub async fn copy_snippet(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath(id): ApiPath<SnippetId>,
) -> Result<(StatusCode, Json<Snippet>), HttpError> {
    let fork = ops::copy_snippet(&state.db, caller.user_id, id)?;
    Ok((StatusCode::CREATED, Json(fork)))
}

/// List the direct forks of a snippet.
///
/// # Errors
/// Returns `404` if the snippet does not exist.
pub async fn list_forks(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<SnippetId>,
) -> Result<Json<Vec<Snippet>>, HttpError> {
    Ok(Json(ops::list_forks(&state.db, id)?))
}

/// Add a collaborator to a snippet owned by the caller.
///
/// # Returns
/// The collaborator list as JSON.
///
/// # Errors
/// Returns `401`, `404`, `403`, or `400` for an unknown user.
pub async fn add_collaborator(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath((id, user_id)): ApiPath<(SnippetId, UserId)>,
) -> Result<Json<Vec<User>>, HttpError> {
    Ok(Json(ops::add_collaborator(
        &state.db,
        caller.user_id,
        id,
        user_id,
    )?))
}

/// Remove a collaborator from a snippet owned by the caller.
///
/// # Errors
/// Returns `401`, `404`, `403`, or `400` when removing the author.
pub async fn remove_collaborator(
    State(state): State<AppState>,
    caller: Caller,
    ApiPath((id, user_id)): ApiPath<(SnippetId, UserId)>,
) -> Result<Json<Vec<User>>, HttpError> {
    Ok(Json(ops::remove_collaborator(
        &state.db,
        caller.user_id,
        id,
        user_id,
    )?))
}

/// Search snippets by title, description, tag name, or language name.
///
/// # Errors
/// Returns an error if storage access fails.
pub async fn search_snippets(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<Snippet>>, HttpError> {
    Ok(Json(ops::search_snippets(&state.db, query.q.as_deref())?))
}
