//! Snippet storage operations backed by redb.
//!
//! Relations live in multimap tables keyed by snippet id, each with a reverse
//! index so deletes can clean up both sides inside the same write transaction.

mod helpers;

use self::helpers::{contains_folded, ensure_references, ensure_user, SnippetTables};
use super::codec::{decode, link, load_row, members, next_id, store_row, unlink};
use super::tables::*;
use crate::error::AppError;
use crate::models::{
    Language, NewSnippet, Snippet, SnippetId, Tag, TagId, UpdateSnippetRequest, UserId,
};
use chrono::Utc;
use redb::{ReadableDatabase, ReadableTable};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Many-to-many sets attached to a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Collaborator users.
    Collaborator,
    /// Tags.
    Tag,
}

/// Relation ids of a snippet, read in one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetRelations {
    pub user_ids: Vec<UserId>,
    pub tag_ids: Vec<TagId>,
    pub fork_ids: Vec<SnippetId>,
}

/// Accessor for snippet rows and their relation tables.
pub struct SnippetDb {
    db: Arc<redb::Database>,
}

impl SnippetDb {
    /// Initialize snippet tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        SnippetTables::open(&write_txn)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Insert a snippet, attach its tags, and add the author as collaborator.
    ///
    /// # Returns
    /// The stored snippet with its allocated id.
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] when the author, language, or a tag does
    /// not exist, or a storage error.
    pub fn create(&self, new: &NewSnippet) -> Result<Snippet, AppError> {
        let write_txn = self.db.begin_write()?;
        ensure_user(&write_txn, new.author_id)?;
        ensure_references(&write_txn, new.language_id, &new.tag_ids)?;
        let snippet = Snippet::from_new(next_id(&write_txn, SEQ_SNIPPET)?, new);
        {
            let mut t = SnippetTables::open(&write_txn)?;
            t.insert(&snippet)?;
            for tag_id in &new.tag_ids {
                link(&mut t.tags, &mut t.tag_snippets, snippet.id, *tag_id)?;
            }
            link(
                &mut t.users,
                &mut t.user_snippets,
                snippet.id,
                snippet.author_id,
            )?;
        }
        write_txn.commit()?;
        Ok(snippet)
    }

    /// Fetch a snippet by id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: SnippetId) -> Result<Option<Snippet>, AppError> {
        let read_txn = self.db.begin_read()?;
        let snippets = read_txn.open_table(SNIPPETS)?;
        load_row(&snippets, id)
    }

    /// Fetch a snippet together with its relation ids.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get_with_relations(
        &self,
        id: SnippetId,
    ) -> Result<Option<(Snippet, SnippetRelations)>, AppError> {
        let read_txn = self.db.begin_read()?;
        let snippets = read_txn.open_table(SNIPPETS)?;
        let Some(snippet) = load_row::<Snippet, _>(&snippets, id)? else {
            return Ok(None);
        };
        let users = read_txn.open_multimap_table(SNIPPET_USERS)?;
        let tags = read_txn.open_multimap_table(SNIPPET_TAGS)?;
        let forks = read_txn.open_multimap_table(SNIPPET_FORKS)?;
        let relations = SnippetRelations {
            user_ids: members(&users, id)?,
            tag_ids: members(&tags, id)?,
            fork_ids: members(&forks, id)?,
        };
        Ok(Some((snippet, relations)))
    }

    /// List all snippets in id order.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list(&self) -> Result<Vec<Snippet>, AppError> {
        self.scan(|_| true)
    }

    /// Fetch the snippets for `ids`, in the given order, skipping missing rows.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get_many(&self, ids: &[SnippetId]) -> Result<Vec<Snippet>, AppError> {
        let read_txn = self.db.begin_read()?;
        let snippets = read_txn.open_table(SNIPPETS)?;
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(snippet) = load_row(&snippets, *id)? {
                out.push(snippet);
            }
        }
        Ok(out)
    }

    fn scan<F>(&self, mut keep: F) -> Result<Vec<Snippet>, AppError>
    where
        F: FnMut(&Snippet) -> bool,
    {
        let read_txn = self.db.begin_read()?;
        let snippets = read_txn.open_table(SNIPPETS)?;
        let mut out = Vec::new();
        for item in snippets.iter()? {
            let (_, value) = item?;
            let snippet: Snippet = decode(value.value())?;
            if keep(&snippet) {
                out.push(snippet);
            }
        }
        Ok(out)
    }

    /// Apply a partial update to a snippet.
    ///
    /// `author_id` and `parent_id` are never touched. A present `tag_ids`
    /// replaces the whole tag set.
    ///
    /// # Returns
    /// `Ok(Some(snippet))` when updated, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] for unknown language or tag ids, or a
    /// storage error.
    pub fn update(
        &self,
        id: SnippetId,
        update: &UpdateSnippetRequest,
    ) -> Result<Option<Snippet>, AppError> {
        let write_txn = self.db.begin_write()?;
        ensure_references(
            &write_txn,
            update.language_id.flatten(),
            update.tag_ids.as_deref().unwrap_or(&[]),
        )?;
        let updated = {
            let mut t = SnippetTables::open(&write_txn)?;
            let Some(mut snippet) = load_row::<Snippet, _>(&t.snippets, id)? else {
                return Ok(None);
            };

            if let Some(title) = &update.title {
                snippet.title = title.clone();
            }
            if let Some(description) = &update.description {
                snippet.description = description.clone();
            }
            if let Some(body) = &update.body {
                snippet.body = body.clone();
            }
            if let Some(language_id) = update.language_id {
                if snippet.language_id != language_id {
                    if let Some(old) = snippet.language_id {
                        t.language_snippets.remove(old, id)?;
                    }
                    if let Some(new) = language_id {
                        t.language_snippets.insert(new, id)?;
                    }
                    snippet.language_id = language_id;
                }
            }
            if let Some(tag_ids) = &update.tag_ids {
                let wanted: BTreeSet<TagId> = tag_ids.iter().copied().collect();
                for current in members(&t.tags, id)? {
                    if !wanted.contains(&current) {
                        unlink(&mut t.tags, &mut t.tag_snippets, id, current)?;
                    }
                }
                for tag_id in wanted {
                    link(&mut t.tags, &mut t.tag_snippets, id, tag_id)?;
                }
            }

            snippet.updated_at = Utc::now();
            store_row(&mut t.snippets, id, &snippet)?;
            snippet
        };
        write_txn.commit()?;
        Ok(Some(updated))
    }

    /// Delete a snippet and return the deleted row.
    ///
    /// Relation rows on both sides are removed. Forks survive with their
    /// `parent_id` cleared.
    ///
    /// # Returns
    /// `Ok(Some(snippet))` when deleted, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn delete(&self, id: SnippetId) -> Result<Option<Snippet>, AppError> {
        let write_txn = self.db.begin_write()?;
        let deleted = {
            let mut t = SnippetTables::open(&write_txn)?;
            let Some(snippet) = load_row::<Snippet, _>(&t.snippets, id)? else {
                return Ok(None);
            };
            t.snippets.remove(id)?;

            for user_id in members(&t.users, id)? {
                t.user_snippets.remove(user_id, id)?;
            }
            t.users.remove_all(id)?;
            for tag_id in members(&t.tags, id)? {
                t.tag_snippets.remove(tag_id, id)?;
            }
            t.tags.remove_all(id)?;
            if let Some(language_id) = snippet.language_id {
                t.language_snippets.remove(language_id, id)?;
            }
            if let Some(parent_id) = snippet.parent_id {
                t.forks.remove(parent_id, id)?;
            }

            let fork_ids = members(&t.forks, id)?;
            t.forks.remove_all(id)?;
            for fork_id in &fork_ids {
                if let Some(mut fork) = load_row::<Snippet, _>(&t.snippets, *fork_id)? {
                    fork.parent_id = None;
                    store_row(&mut t.snippets, *fork_id, &fork)?;
                }
            }
            if !fork_ids.is_empty() {
                tracing::info!(
                    "Detached {} fork(s) from deleted snippet {}",
                    fork_ids.len(),
                    id
                );
            }
            snippet
        };
        write_txn.commit()?;
        Ok(Some(deleted))
    }

    /// Fork `source_id` into a new snippet authored by `author_id`.
    ///
    /// Content, language, collaborator set, and tag set are copied inside one
    /// write transaction; the fork's sets are independent of the source's.
    ///
    /// # Returns
    /// `Ok(Some(fork))` on success, `Ok(None)` when the source is missing.
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] when the author does not exist, or a
    /// storage error.
    pub fn fork(
        &self,
        source_id: SnippetId,
        author_id: UserId,
    ) -> Result<Option<Snippet>, AppError> {
        let write_txn = self.db.begin_write()?;
        ensure_user(&write_txn, author_id)?;
        let new_id = next_id(&write_txn, SEQ_SNIPPET)?;
        let forked = {
            let mut t = SnippetTables::open(&write_txn)?;
            let Some(source) = load_row::<Snippet, _>(&t.snippets, source_id)? else {
                return Ok(None);
            };
            let user_ids = members(&t.users, source_id)?;
            let tag_ids = members(&t.tags, source_id)?;

            let fork = source.fork(new_id, author_id);
            t.insert(&fork)?;
            for user_id in user_ids {
                link(&mut t.users, &mut t.user_snippets, fork.id, user_id)?;
            }
            for tag_id in tag_ids {
                link(&mut t.tags, &mut t.tag_snippets, fork.id, tag_id)?;
            }
            fork
        };
        write_txn.commit()?;
        Ok(Some(forked))
    }

    /// Add a member to one of a snippet's sets.
    ///
    /// # Returns
    /// `true` when the member was newly added, `false` when already present.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] for a missing snippet,
    /// [`AppError::Validation`] for a missing member, or a storage error.
    pub fn add_member(
        &self,
        id: SnippetId,
        relation: Relation,
        member_id: u64,
    ) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        match relation {
            Relation::Collaborator => ensure_user(&write_txn, member_id)?,
            Relation::Tag => ensure_references(&write_txn, None, &[member_id])?,
        }
        let added = {
            let mut t = SnippetTables::open(&write_txn)?;
            if t.snippets.get(id)?.is_none() {
                return Err(AppError::NotFound);
            }
            let added = match relation {
                Relation::Collaborator => link(&mut t.users, &mut t.user_snippets, id, member_id)?,
                Relation::Tag => link(&mut t.tags, &mut t.tag_snippets, id, member_id)?,
            };
            added
        };
        write_txn.commit()?;
        Ok(added)
    }

    /// Remove a member from one of a snippet's sets.
    ///
    /// # Returns
    /// `true` when the member was present.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] for a missing snippet, or a storage error.
    pub fn remove_member(
        &self,
        id: SnippetId,
        relation: Relation,
        member_id: u64,
    ) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut t = SnippetTables::open(&write_txn)?;
            if t.snippets.get(id)?.is_none() {
                return Err(AppError::NotFound);
            }
            let removed = match relation {
                Relation::Collaborator => {
                    unlink(&mut t.users, &mut t.user_snippets, id, member_id)?
                }
                Relation::Tag => unlink(&mut t.tags, &mut t.tag_snippets, id, member_id)?,
            };
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Ids of the members of one of a snippet's sets, ascending.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn member_ids(&self, id: SnippetId, relation: Relation) -> Result<Vec<u64>, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = match relation {
            Relation::Collaborator => read_txn.open_multimap_table(SNIPPET_USERS)?,
            Relation::Tag => read_txn.open_multimap_table(SNIPPET_TAGS)?,
        };
        members(&table, id)
    }

    /// Ids of the snippets forked from `id`, ascending.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn fork_ids(&self, id: SnippetId) -> Result<Vec<SnippetId>, AppError> {
        let read_txn = self.db.begin_read()?;
        let forks = read_txn.open_multimap_table(SNIPPET_FORKS)?;
        members(&forks, id)
    }

    /// Snippets whose title, description, a tag name, or the language name
    /// contains `query`, case-insensitively.
    ///
    /// A blank query matches nothing. Otherwise the query is matched as given,
    /// surrounding whitespace included. Results are deduplicated and ordered
    /// by id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn search(&self, query: &str) -> Result<Vec<Snippet>, AppError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let needle = query.to_lowercase();

        let read_txn = self.db.begin_read()?;
        let languages = read_txn.open_table(LANGUAGES)?;
        let tags = read_txn.open_table(TAGS)?;
        let tag_snippets = read_txn.open_multimap_table(TAG_SNIPPETS)?;
        let snippets = read_txn.open_table(SNIPPETS)?;

        let mut language_hits = HashSet::new();
        for item in languages.iter()? {
            let (key, value) = item?;
            let language: Language = decode(value.value())?;
            if contains_folded(&language.name, &needle) {
                language_hits.insert(key.value());
            }
        }

        let mut tagged = HashSet::new();
        for item in tags.iter()? {
            let (key, value) = item?;
            let tag: Tag = decode(value.value())?;
            if contains_folded(&tag.name, &needle) {
                tagged.extend(members(&tag_snippets, key.value())?);
            }
        }

        let mut out = Vec::new();
        for item in snippets.iter()? {
            let (_, value) = item?;
            let snippet: Snippet = decode(value.value())?;
            let matched = contains_folded(&snippet.title, &needle)
                || contains_folded(&snippet.description, &needle)
                || tagged.contains(&snippet.id)
                || snippet
                    .language_id
                    .map(|id| language_hits.contains(&id))
                    .unwrap_or(false);
            if matched {
                out.push(snippet);
            }
        }
        Ok(out)
    }

    /// Snippets `user_id` authored or collaborates on, deduplicated, by id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn for_user(&self, user_id: UserId) -> Result<Vec<Snippet>, AppError> {
        let collaborating: HashSet<SnippetId> = {
            let read_txn = self.db.begin_read()?;
            let index = read_txn.open_multimap_table(USER_SNIPPETS)?;
            let ids = members(&index, user_id)?;
            ids.into_iter().collect()
        };
        self.scan(|snippet| snippet.author_id == user_id || collaborating.contains(&snippet.id))
    }
}
