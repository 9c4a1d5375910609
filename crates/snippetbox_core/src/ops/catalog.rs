//! Language and tag operations.
//!
//! Reads are open to everyone. Writes need an authenticated caller but no
//! ownership: any user may rename or delete any language or tag.

use super::validate;
use crate::access::require_caller;
use crate::models::{Language, LanguageId, LanguageRequest, Snippet, Tag, TagId, TagRequest};
use crate::{AppError, Database, UserId};

/// List all languages.
///
/// # Errors
/// Returns an error when storage access fails.
pub fn list_languages(db: &Database) -> Result<Vec<Language>, AppError> {
    db.languages.list()
}

/// Fetch a language by id.
///
/// # Errors
/// Returns [`AppError::NotFound`] when the language does not exist.
pub fn detail_language(db: &Database, id: LanguageId) -> Result<Language, AppError> {
    db.languages.get(id)?.ok_or(AppError::NotFound)
}

/// Create a language.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] without a caller or
/// [`AppError::Validation`] for an invalid name.
pub fn create_language(
    db: &Database,
    caller: Option<UserId>,
    req: &LanguageRequest,
) -> Result<Language, AppError> {
    let caller = require_caller(caller)?;
    let language = db.languages.create(&validate::name(&req.name)?)?;
    tracing::info!("User {} created language {}", caller, language.id);
    Ok(language)
}

/// Rename a language.
///
/// # Errors
/// Returns [`AppError::Unauthorized`], [`AppError::NotFound`], or
/// [`AppError::Validation`].
pub fn edit_language(
    db: &Database,
    caller: Option<UserId>,
    id: LanguageId,
    req: &LanguageRequest,
) -> Result<Language, AppError> {
    require_caller(caller)?;
    let name = validate::name(&req.name)?;
    db.languages.rename(id, &name)?.ok_or(AppError::NotFound)
}

/// Delete a language, clearing it from the snippets that used it.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] or [`AppError::NotFound`].
pub fn delete_language(
    db: &Database,
    caller: Option<UserId>,
    id: LanguageId,
) -> Result<(), AppError> {
    require_caller(caller)?;
    if db.languages.delete(id)? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

/// List all tags.
///
/// # Errors
/// Returns an error when storage access fails.
pub fn list_tags(db: &Database) -> Result<Vec<Tag>, AppError> {
    db.tags.list()
}

/// Fetch a tag by id.
///
/// # Errors
/// Returns [`AppError::NotFound`] when the tag does not exist.
pub fn detail_tag(db: &Database, id: TagId) -> Result<Tag, AppError> {
    db.tags.get(id)?.ok_or(AppError::NotFound)
}

/// Snippets carrying tag `id`, in id order.
///
/// # Errors
/// Returns [`AppError::NotFound`] when the tag does not exist.
pub fn tag_snippets(db: &Database, id: TagId) -> Result<Vec<Snippet>, AppError> {
    if db.tags.get(id)?.is_none() {
        return Err(AppError::NotFound);
    }
    let ids = db.tags.snippet_ids(id)?;
    db.snippets.get_many(&ids)
}

/// Create a tag.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] without a caller or
/// [`AppError::Validation`] for an invalid name.
pub fn create_tag(
    db: &Database,
    caller: Option<UserId>,
    req: &TagRequest,
) -> Result<Tag, AppError> {
    let caller = require_caller(caller)?;
    let tag = db.tags.create(&validate::name(&req.name)?)?;
    tracing::info!("User {} created tag {}", caller, tag.id);
    Ok(tag)
}

/// Rename a tag.
///
/// # Errors
/// Returns [`AppError::Unauthorized`], [`AppError::NotFound`], or
/// [`AppError::Validation`].
pub fn edit_tag(
    db: &Database,
    caller: Option<UserId>,
    id: TagId,
    req: &TagRequest,
) -> Result<Tag, AppError> {
    require_caller(caller)?;
    let name = validate::name(&req.name)?;
    db.tags.rename(id, &name)?.ok_or(AppError::NotFound)
}

/// Delete a tag and detach it from every snippet.
///
/// # Errors
/// Returns [`AppError::Unauthorized`] or [`AppError::NotFound`].
pub fn delete_tag(db: &Database, caller: Option<UserId>, id: TagId) -> Result<(), AppError> {
    require_caller(caller)?;
    if db.tags.delete(id)? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}
