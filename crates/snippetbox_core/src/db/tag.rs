//! Tag storage operations backed by redb.

use super::codec::{decode, load_row, members, next_id, store_row};
use super::tables::{SEQ_TAG, SNIPPET_TAGS, TAGS, TAG_SNIPPETS};
use crate::error::AppError;
use crate::models::{SnippetId, Tag, TagId};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;

/// Accessor for the `tags` table and its reverse membership index.
pub struct TagDb {
    db: Arc<redb::Database>,
}

impl TagDb {
    /// Initialize tag tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(TAGS)?;
        write_txn.open_multimap_table(SNIPPET_TAGS)?;
        write_txn.open_multimap_table(TAG_SNIPPETS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a tag with a freshly allocated id.
    ///
    /// # Errors
    /// Returns an error when serialization or storage fails.
    pub fn create(&self, name: &str) -> Result<Tag, AppError> {
        let write_txn = self.db.begin_write()?;
        let tag = Tag {
            id: next_id(&write_txn, SEQ_TAG)?,
            name: name.to_string(),
        };
        {
            let mut tags = write_txn.open_table(TAGS)?;
            store_row(&mut tags, tag.id, &tag)?;
        }
        write_txn.commit()?;
        Ok(tag)
    }

    /// Fetch a tag by id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: TagId) -> Result<Option<Tag>, AppError> {
        let read_txn = self.db.begin_read()?;
        let tags = read_txn.open_table(TAGS)?;
        load_row(&tags, id)
    }

    /// List all tags in id order.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list(&self) -> Result<Vec<Tag>, AppError> {
        let read_txn = self.db.begin_read()?;
        let tags = read_txn.open_table(TAGS)?;
        let mut out = Vec::new();
        for item in tags.iter()? {
            let (_, value) = item?;
            out.push(decode(value.value())?);
        }
        Ok(out)
    }

    /// Ids of the snippets currently carrying tag `id`.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn snippet_ids(&self, id: TagId) -> Result<Vec<SnippetId>, AppError> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_multimap_table(TAG_SNIPPETS)?;
        members(&index, id)
    }

    /// Rename a tag.
    ///
    /// # Returns
    /// `Ok(Some(tag))` when updated, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn rename(&self, id: TagId, name: &str) -> Result<Option<Tag>, AppError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut tags = write_txn.open_table(TAGS)?;
            let Some(mut tag) = load_row::<Tag, _>(&tags, id)? else {
                return Ok(None);
            };
            tag.name = name.to_string();
            store_row(&mut tags, id, &tag)?;
            tag
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }

    /// Delete a tag and remove it from every snippet's tag set.
    ///
    /// # Returns
    /// `true` when a tag was deleted.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn delete(&self, id: TagId) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut tags = write_txn.open_table(TAGS)?;
            if tags.remove(id)?.is_none() {
                return Ok(false);
            }

            let mut reverse = write_txn.open_multimap_table(TAG_SNIPPETS)?;
            let snippet_ids = members(&reverse, id)?;
            reverse.remove_all(id)?;

            let mut forward = write_txn.open_multimap_table(SNIPPET_TAGS)?;
            for snippet_id in &snippet_ids {
                forward.remove(*snippet_id, id)?;
            }
            tracing::info!(
                "Deleted tag {} and detached it from {} snippet(s)",
                id,
                snippet_ids.len()
            );
        }
        write_txn.commit()?;
        Ok(true)
    }
}
