//! Point-in-time copies of the redb database file.

use super::redb_file_path;
use super::time_util::unix_timestamp_seconds;
use crate::error::AppError;
use std::path::PathBuf;
use std::time::SystemTime;

/// Creates timestamped copies of the database file next to the original.
pub struct BackupManager {
    db_file: PathBuf,
}

impl BackupManager {
    /// Create a backup manager for the database directory `db_path`.
    pub fn new(db_path: &str) -> Self {
        Self {
            db_file: redb_file_path(db_path),
        }
    }

    /// Copy the database file to `<file>.backup.<unix-seconds>`.
    ///
    /// Must be called while no write transaction is in flight; redb commits
    /// are durable, so the copy is consistent as of the last commit.
    ///
    /// # Returns
    /// `Some(path)` of the backup, or `None` when no database file exists yet.
    ///
    /// # Errors
    /// Returns an error if the clock is unusable or the copy fails.
    pub fn create_backup(&self) -> Result<Option<PathBuf>, AppError> {
        if !self.db_file.exists() {
            return Ok(None);
        }

        let timestamp = unix_timestamp_seconds(SystemTime::now())?;
        let mut backup = self.db_file.clone().into_os_string();
        backup.push(format!(".backup.{}", timestamp));
        let backup = PathBuf::from(backup);

        std::fs::copy(&self.db_file, &backup).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to copy {} to {}: {}",
                self.db_file.display(),
                backup.display(),
                err
            ))
        })?;
        tracing::info!("Created database backup at {}", backup.display());
        Ok(Some(backup))
    }
}
