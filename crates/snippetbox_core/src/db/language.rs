//! Language storage operations backed by redb.

use super::codec::{decode, load_row, members, next_id, store_row};
use super::tables::{LANGUAGES, LANGUAGE_SNIPPETS, SEQ_LANGUAGE, SNIPPETS};
use crate::error::AppError;
use crate::models::{Language, LanguageId, Snippet};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for the `languages` table.
pub struct LanguageDb {
    db: Arc<redb::Database>,
}

impl LanguageDb {
    /// Initialize language tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(LANGUAGES)?;
        write_txn.open_multimap_table(LANGUAGE_SNIPPETS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a language with a freshly allocated id.
    ///
    /// # Errors
    /// Returns an error when serialization or storage fails.
    pub fn create(&self, name: &str) -> Result<Language, AppError> {
        let write_txn = self.db.begin_write()?;
        let language = Language {
            id: next_id(&write_txn, SEQ_LANGUAGE)?,
            name: name.to_string(),
        };
        {
            let mut languages = write_txn.open_table(LANGUAGES)?;
            store_row(&mut languages, language.id, &language)?;
        }
        write_txn.commit()?;
        Ok(language)
    }

    /// Fetch a language by id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: LanguageId) -> Result<Option<Language>, AppError> {
        let read_txn = self.db.begin_read()?;
        let languages = read_txn.open_table(LANGUAGES)?;
        load_row(&languages, id)
    }

    /// List all languages in id order.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list(&self) -> Result<Vec<Language>, AppError> {
        let read_txn = self.db.begin_read()?;
        let languages = read_txn.open_table(LANGUAGES)?;
        let mut out = Vec::new();
        for item in languages.iter()? {
            let (_, value) = item?;
            out.push(decode(value.value())?);
        }
        Ok(out)
    }

    /// Rename a language.
    ///
    /// # Returns
    /// `Ok(Some(language))` when updated, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn rename(&self, id: LanguageId, name: &str) -> Result<Option<Language>, AppError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut languages = write_txn.open_table(LANGUAGES)?;
            let Some(mut language) = load_row::<Language, _>(&languages, id)? else {
                return Ok(None);
            };
            language.name = name.to_string();
            store_row(&mut languages, id, &language)?;
            language
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }

    /// Delete a language and clear it from every snippet that used it.
    ///
    /// # Returns
    /// `true` when a language was deleted.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn delete(&self, id: LanguageId) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut languages = write_txn.open_table(LANGUAGES)?;
            if languages.remove(id)?.is_none() {
                return Ok(false);
            }

            let mut usage = write_txn.open_multimap_table(LANGUAGE_SNIPPETS)?;
            let snippet_ids = members(&usage, id)?;
            usage.remove_all(id)?;

            let mut snippets = write_txn.open_table(SNIPPETS)?;
            for snippet_id in &snippet_ids {
                if let Some(mut snippet) = load_row::<Snippet, _>(&snippets, *snippet_id)? {
                    snippet.language_id = None;
                    store_row(&mut snippets, *snippet_id, &snippet)?;
                }
            }
            tracing::info!(
                "Deleted language {} and cleared it from {} snippet(s)",
                id,
                snippet_ids.len()
            );
        }
        write_txn.commit()?;
        Ok(true)
    }
}
