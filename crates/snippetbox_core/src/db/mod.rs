//! Database layer for SnippetBox.

/// Backup utilities.
pub mod backup;
pub(crate) mod codec;
/// Language storage helpers.
pub mod language;
/// Snippet storage helpers, including relations and forks.
pub mod snippet;
/// Table definitions.
pub mod tables;
/// Tag storage helpers.
pub mod tag;
mod time_util;
/// User and session storage helpers.
pub mod user;

use crate::constants::REDB_FILE_NAME;
use crate::error::AppError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Database handle with access to the typed table accessors.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub snippets: snippet::SnippetDb,
    pub languages: language::LanguageDb,
    pub tags: tag::TagDb,
    pub users: user::UserDb,
}

/// Resolve the redb file path inside a database directory.
pub fn redb_file_path(db_path: &str) -> PathBuf {
    Path::new(db_path).join(REDB_FILE_NAME)
}

fn open_error(path: &Path, err: redb::DatabaseError) -> AppError {
    match err {
        redb::DatabaseError::DatabaseAlreadyOpen => AppError::StorageMessage(format!(
            "Database at {} is already open in another SnippetBox process.\n\
             Stop the other process, or set DB_PATH to use a different database location.",
            path.display()
        )),
        other => other.into(),
    }
}

impl Database {
    /// Build a database handle from an already-open redb instance.
    ///
    /// # Errors
    /// Returns an error if table initialization fails.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            snippets: snippet::SnippetDb::new(db.clone())?,
            languages: language::LanguageDb::new(db.clone())?,
            tags: tag::TagDb::new(db.clone())?,
            users: user::UserDb::new(db.clone())?,
            db,
        })
    }

    /// Open (or create) the database in directory `path` and initialize tables.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, redb cannot open
    /// the file, or tables cannot be initialized.
    pub fn new(path: &str) -> Result<Self, AppError> {
        std::fs::create_dir_all(path).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                path, err
            ))
        })?;

        let file = redb_file_path(path);
        let db = redb::Database::create(&file).map_err(|err| open_error(&file, err))?;
        tracing::debug!("Opened database at {}", file.display());
        Self::from_shared(Arc::new(db))
    }
}

#[cfg(test)]
mod tests;
