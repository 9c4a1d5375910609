//! Snippet operations used by the HTTP handlers.

use super::validate;
use crate::access::{ensure_author, require_caller};
use crate::db::snippet::Relation;
use crate::models::{
    CreateSnippetRequest, NewSnippet, Snippet, SnippetDetail, SnippetId, UpdateSnippetRequest,
    User,
};
use crate::{AppError, Database, UserId};

/// Load a snippet for mutation by `caller`, enforcing authorship.
fn load_owned(db: &Database, caller: UserId, id: SnippetId) -> Result<Snippet, AppError> {
    let snippet = db.snippets.get(id)?.ok_or(AppError::NotFound)?;
    ensure_author(&snippet, caller)?;
    Ok(snippet)
}

/// List every snippet in id order.
///
/// # Errors
/// Returns an error when storage access fails.
pub fn list_snippets(db: &Database) -> Result<Vec<Snippet>, AppError> {
    db.snippets.list()
}

/// Fetch a snippet with its language, collaborators, tags, and fork count.
///
/// # Errors
/// Returns [`AppError::NotFound`] when the snippet does not exist.
pub fn detail_snippet(db: &Database, id: SnippetId) -> Result<SnippetDetail, AppError> {
    let (snippet, relations) = db
        .snippets
        .get_with_relations(id)?
        .ok_or(AppError::NotFound)?;
    let language = match snippet.language_id {
        Some(language_id) => db.languages.get(language_id)?,
        None => None,
    };
    let users = db.users.get_many(&relations.user_ids)?;
    let mut tags = Vec::with_capacity(relations.tag_ids.len());
    for tag_id in &relations.tag_ids {
        if let Some(tag) = db.tags.get(*tag_id)? {
            tags.push(tag);
        }
    }
    Ok(SnippetDetail {
        snippet,
        language,
        users,
        tags,
        forks: relations.fork_ids.len(),
    })
}

/// Create a snippet authored by `caller`.
///
/// The caller also becomes the first collaborator.
///
/// # Arguments
/// - `db`: Open database handle.
/// - `caller`: Resolved session user.
/// - `req`: Creation payload.
///
/// # Returns
/// The stored snippet.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] without a caller,
/// [`AppError::Validation`] for invalid fields or unknown references, or a
/// storage error.
pub fn create_snippet(
    db: &Database,
    caller: Option<UserId>,
    req: CreateSnippetRequest,
) -> Result<Snippet, AppError> {
    let author_id = require_caller(caller)?;
    let new = NewSnippet {
        title: validate::title(&req.title)?,
        description: validate::description(&req.description)?,
        body: req.body,
        language_id: req.language_id,
        tag_ids: req.tag_ids,
        author_id,
    };
    let snippet = db.snippets.create(&new)?;
    tracing::info!("User {} created snippet {}", author_id, snippet.id);
    Ok(snippet)
}

/// Apply a partial update to a snippet owned by `caller`.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] without a caller,
/// [`AppError::NotFound`] for a missing snippet, [`AppError::Forbidden`] when
/// the caller is not the author, or [`AppError::Validation`] for bad fields.
pub fn edit_snippet(
    db: &Database,
    caller: Option<UserId>,
    id: SnippetId,
    mut req: UpdateSnippetRequest,
) -> Result<Snippet, AppError> {
    let caller = require_caller(caller)?;
    load_owned(db, caller, id)?;
    if let Some(title) = req.title.as_deref() {
        req.title = Some(validate::title(title)?);
    }
    if let Some(description) = req.description.as_deref() {
        req.description = Some(validate::description(description)?);
    }
    db.snippets.update(id, &req)?.ok_or(AppError::NotFound)
}

/// Delete a snippet owned by `caller`. Its forks stay, with no parent.
///
/// # Errors
/// Returns [`AppError::Unauthorized`], [`AppError::NotFound`], or
/// [`AppError::Forbidden`] per the caller guards, or a storage error.
pub fn delete_snippet(
    db: &Database,
    caller: Option<UserId>,
    id: SnippetId,
) -> Result<(), AppError> {
    let caller = require_caller(caller)?;
    load_owned(db, caller, id)?;
    db.snippets.delete(id)?.ok_or(AppError::NotFound)?;
    tracing::info!("User {} deleted snippet {}", caller, id);
    Ok(())
}

/// Fork snippet `id` into a new snippet authored by `caller`.
///
/// Any authenticated user may fork any snippet.
///
/// # Returns
/// The new fork.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] without a caller,
/// [`AppError::NotFound`] for a missing source, or a storage error.
pub fn copy_snippet(
    db: &Database,
    caller: Option<UserId>,
    id: SnippetId,
) -> Result<Snippet, AppError> {
    let caller = require_caller(caller)?;
    let fork = db.snippets.fork(id, caller)?.ok_or(AppError::NotFound)?;
    tracing::info!("User {} forked snippet {} as {}", caller, id, fork.id);
    Ok(fork)
}

/// Case-insensitive OR-search over title, description, tag names, and
/// language name. A missing or blank query matches nothing.
///
/// # Errors
/// Returns an error when storage access fails.
pub fn search_snippets(db: &Database, query: Option<&str>) -> Result<Vec<Snippet>, AppError> {
    db.snippets.search(query.unwrap_or_default())
}

/// Snippets the caller authored or collaborates on.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] without a caller, or a storage error.
pub fn user_profile(db: &Database, caller: Option<UserId>) -> Result<Vec<Snippet>, AppError> {
    let caller = require_caller(caller)?;
    db.snippets.for_user(caller)
}

/// Snippets forked directly from `id`.
///
/// # Errors
/// Returns [`AppError::NotFound`] when the snippet does not exist.
pub fn list_forks(db: &Database, id: SnippetId) -> Result<Vec<Snippet>, AppError> {
    if db.snippets.get(id)?.is_none() {
        return Err(AppError::NotFound);
    }
    let ids = db.snippets.fork_ids(id)?;
    db.snippets.get_many(&ids)
}

fn collaborators(db: &Database, id: SnippetId) -> Result<Vec<User>, AppError> {
    let ids = db.snippets.member_ids(id, Relation::Collaborator)?;
    db.users.get_many(&ids)
}

/// Add `user_id` to the collaborators of a snippet owned by `caller`.
///
/// # Returns
/// The collaborator list after the change.
///
/// # Errors
/// Returns the caller guard errors, [`AppError::Validation`] for an unknown
/// user, or a storage error.
pub fn add_collaborator(
    db: &Database,
    caller: Option<UserId>,
    id: SnippetId,
    user_id: UserId,
) -> Result<Vec<User>, AppError> {
    let caller = require_caller(caller)?;
    load_owned(db, caller, id)?;
    if db.snippets.add_member(id, Relation::Collaborator, user_id)? {
        tracing::info!("Added user {} to snippet {}", user_id, id);
    }
    collaborators(db, id)
}

/// Remove `user_id` from the collaborators of a snippet owned by `caller`.
///
/// The author always stays a collaborator.
///
/// # Returns
/// The collaborator list after the change.
///
/// # Errors
/// Returns the caller guard errors, [`AppError::Validation`] when removing
/// the author, or a storage error.
pub fn remove_collaborator(
    db: &Database,
    caller: Option<UserId>,
    id: SnippetId,
    user_id: UserId,
) -> Result<Vec<User>, AppError> {
    let caller = require_caller(caller)?;
    let snippet = load_owned(db, caller, id)?;
    if snippet.author_id == user_id {
        return Err(AppError::Validation(
            "The author cannot be removed from collaborators".to_string(),
        ));
    }
    let relation = Relation::Collaborator;
    if db.snippets.remove_member(id, relation, user_id)? {
        tracing::info!("Removed user {} from snippet {}", user_id, id);
    }
    collaborators(db, id)
}
