//! User and session storage backed by redb.

use super::codec::{decode, encode, load_row, next_id, store_row};
use super::tables::{SEQ_USER, SESSIONS, USERS, USERS_BY_NAME};
use crate::error::AppError;
use crate::models::{Session, User, UserId};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable, Table};
use std::sync::Arc;

/// Accessor for user rows, the username index, and bearer sessions.
pub struct UserDb {
    db: Arc<redb::Database>,
}

impl UserDb {
    /// Initialize user and session tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(USERS)?;
        write_txn.open_table(USERS_BY_NAME)?;
        write_txn.open_table(SESSIONS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Return the user named `username`, creating it on first sight.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn get_or_create(&self, username: &str) -> Result<User, AppError> {
        let write_txn = self.db.begin_write()?;
        let existing = {
            let by_name = write_txn.open_table(USERS_BY_NAME)?;
            let id = by_name.get(username)?.map(|guard| guard.value());
            id
        };
        if let Some(id) = existing {
            let users = write_txn.open_table(USERS)?;
            return load_row::<User, _>(&users, id)?.ok_or_else(|| {
                AppError::StorageMessage(format!("Username index points at missing user {}", id))
            });
        }

        let user = User {
            id: next_id(&write_txn, SEQ_USER)?,
            username: username.to_string(),
            created_at: Utc::now(),
        };
        {
            let mut users = write_txn.open_table(USERS)?;
            let mut by_name = write_txn.open_table(USERS_BY_NAME)?;
            store_row(&mut users, user.id, &user)?;
            by_name.insert(username, user.id)?;
        }
        write_txn.commit()?;
        tracing::info!("Registered user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Fetch a user by id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: UserId) -> Result<Option<User>, AppError> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        load_row(&users, id)
    }

    /// Fetch the users for `ids`, skipping ids with no row.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get_many(&self, ids: &[UserId]) -> Result<Vec<User>, AppError> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = load_row(&users, *id)? {
                out.push(user);
            }
        }
        Ok(out)
    }

    /// Persist a new session for `user_id`.
    ///
    /// Expired sessions are pruned in the same write transaction.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] for unknown users, or a storage error.
    pub fn create_session(&self, user_id: UserId) -> Result<Session, AppError> {
        self.create_session_at(user_id, Utc::now())
    }

    pub(crate) fn create_session_at(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let session = Session::issued_at(user_id, now);
        let encoded = encode(&session)?;
        let write_txn = self.db.begin_write()?;
        {
            let users = write_txn.open_table(USERS)?;
            if users.get(user_id)?.is_none() {
                return Err(AppError::NotFound);
            }
            let mut sessions = write_txn.open_table(SESSIONS)?;
            let pruned = prune_expired(&mut sessions, now)?;
            if pruned > 0 {
                tracing::debug!("Pruned {} expired session(s)", pruned);
            }
            sessions.insert(session.token.as_str(), encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(session)
    }

    /// Resolve a bearer token to its user id. Expired tokens do not resolve.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn resolve_session(&self, token: &str) -> Result<Option<UserId>, AppError> {
        self.resolve_session_at(token, Utc::now())
    }

    pub(crate) fn resolve_session_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, AppError> {
        let read_txn = self.db.begin_read()?;
        let sessions = read_txn.open_table(SESSIONS)?;
        match sessions.get(token)? {
            Some(guard) => {
                let session: Session = decode(guard.value())?;
                if session.is_expired_at(now) {
                    return Ok(None);
                }
                Ok(Some(session.user_id))
            }
            None => Ok(None),
        }
    }

    /// Revoke a session.
    ///
    /// # Returns
    /// `true` when the token existed.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn delete_session(&self, token: &str) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut sessions = write_txn.open_table(SESSIONS)?;
            let removed = sessions.remove(token)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }
}

fn prune_expired(
    sessions: &mut Table<&'static str, &'static [u8]>,
    now: DateTime<Utc>,
) -> Result<usize, AppError> {
    let mut expired = Vec::new();
    for item in sessions.iter()? {
        let (token, value) = item?;
        let session: Session = decode(value.value())?;
        if session.is_expired_at(now) {
            expired.push(token.value().to_string());
        }
    }
    for token in &expired {
        sessions.remove(token.as_str())?;
    }
    Ok(expired.len())
}
