//! User identity and session models.

use super::UserId;
use crate::constants::SESSION_TTL_HOURS;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A user known to SnippetBox.
///
/// Identity verification is owned by the login collaborator; the domain only
/// uses the id as a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Bearer session issued at login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session with a fresh random token.
    pub fn new(user_id: UserId) -> Self {
        Self::issued_at(user_id, Utc::now())
    }

    /// Create a session with a fresh random token issued at `now`.
    pub fn issued_at(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            token: uuid::Uuid::new_v4().simple().to_string(),
            user_id,
            created_at: now,
        }
    }

    /// Instant after which the token no longer resolves.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::hours(SESSION_TTL_HOURS)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Request payload for opening a session.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
