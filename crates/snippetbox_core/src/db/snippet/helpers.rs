//! Helper types and checks shared by snippet storage operations.

use crate::db::codec::store_row;
use crate::db::tables::*;
use crate::error::AppError;
use crate::models::{LanguageId, Snippet, TagId, UserId};
use redb::{MultimapTable, ReadableTable, Table, WriteTransaction};

/// Every table a snippet write may touch, opened inside one write transaction.
pub(super) struct SnippetTables<'txn> {
    pub(super) snippets: Table<'txn, u64, &'static [u8]>,
    pub(super) users: MultimapTable<'txn, u64, u64>,
    pub(super) user_snippets: MultimapTable<'txn, u64, u64>,
    pub(super) tags: MultimapTable<'txn, u64, u64>,
    pub(super) tag_snippets: MultimapTable<'txn, u64, u64>,
    pub(super) forks: MultimapTable<'txn, u64, u64>,
    pub(super) language_snippets: MultimapTable<'txn, u64, u64>,
}

impl<'txn> SnippetTables<'txn> {
    pub(super) fn open(txn: &'txn WriteTransaction) -> Result<Self, AppError> {
        Ok(Self {
            snippets: txn.open_table(SNIPPETS)?,
            users: txn.open_multimap_table(SNIPPET_USERS)?,
            user_snippets: txn.open_multimap_table(USER_SNIPPETS)?,
            tags: txn.open_multimap_table(SNIPPET_TAGS)?,
            tag_snippets: txn.open_multimap_table(TAG_SNIPPETS)?,
            forks: txn.open_multimap_table(SNIPPET_FORKS)?,
            language_snippets: txn.open_multimap_table(LANGUAGE_SNIPPETS)?,
        })
    }

    /// Insert a new snippet row with its language and parent index entries.
    ///
    /// Rejects duplicate ids, self-parenting, and parents that do not exist.
    pub(super) fn insert(&mut self, snippet: &Snippet) -> Result<(), AppError> {
        if self.snippets.get(snippet.id)?.is_some() {
            return Err(AppError::StorageMessage(format!(
                "Snippet id '{}' already exists",
                snippet.id
            )));
        }
        if let Some(parent_id) = snippet.parent_id {
            if parent_id == snippet.id {
                return Err(AppError::Validation(
                    "A snippet cannot be its own parent".to_string(),
                ));
            }
            if self.snippets.get(parent_id)?.is_none() {
                return Err(AppError::NotFound);
            }
            self.forks.insert(parent_id, snippet.id)?;
        }
        if let Some(language_id) = snippet.language_id {
            self.language_snippets.insert(language_id, snippet.id)?;
        }
        store_row(&mut self.snippets, snippet.id, snippet)
    }
}

/// Verify that every referenced language and tag exists.
pub(super) fn ensure_references(
    txn: &WriteTransaction,
    language_id: Option<LanguageId>,
    tag_ids: &[TagId],
) -> Result<(), AppError> {
    if let Some(language_id) = language_id {
        let languages = txn.open_table(LANGUAGES)?;
        if languages.get(language_id)?.is_none() {
            return Err(AppError::Validation(format!(
                "Language with id '{}' does not exist",
                language_id
            )));
        }
    }
    if !tag_ids.is_empty() {
        let tags = txn.open_table(TAGS)?;
        for tag_id in tag_ids {
            if tags.get(*tag_id)?.is_none() {
                return Err(AppError::Validation(format!(
                    "Tag with id '{}' does not exist",
                    tag_id
                )));
            }
        }
    }
    Ok(())
}

pub(super) fn ensure_user(txn: &WriteTransaction, user_id: UserId) -> Result<(), AppError> {
    let users = txn.open_table(USERS)?;
    if users.get(user_id)?.is_none() {
        return Err(AppError::Validation(format!(
            "User with id '{}' does not exist",
            user_id
        )));
    }
    Ok(())
}

/// Case-insensitive substring test; `needle_lower` must already be lowercase.
pub(super) fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    if needle_lower.is_ascii() && haystack.is_ascii() {
        let needle = needle_lower.as_bytes();
        return haystack
            .as_bytes()
            .windows(needle.len().max(1))
            .any(|window| window.eq_ignore_ascii_case(needle));
    }
    haystack.to_lowercase().contains(needle_lower)
}
