//! Snippet models and request payloads.

use super::{Language, LanguageId, SnippetId, Tag, TagId, User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Snippet row stored in the database and returned by the API.
///
/// `author_id` is written once at insert time; no update path rewrites it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    pub description: String,
    pub body: String,
    pub language_id: Option<LanguageId>,
    pub author_id: UserId,
    pub parent_id: Option<SnippetId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated insert payload for [`crate::db::snippet::SnippetDb::create`].
#[derive(Debug, Clone)]
pub struct NewSnippet {
    pub title: String,
    pub description: String,
    pub body: String,
    pub language_id: Option<LanguageId>,
    pub tag_ids: Vec<TagId>,
    pub author_id: UserId,
}

/// Snippet together with its relations, as shown on the detail route.
#[derive(Debug, Clone, Serialize)]
pub struct SnippetDetail {
    #[serde(flatten)]
    pub snippet: Snippet,
    pub language: Option<Language>,
    pub users: Vec<User>,
    pub tags: Vec<Tag>,
    pub forks: usize,
}

/// Request payload for creating a snippet.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSnippetRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body: String,
    pub language_id: Option<LanguageId>,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
}

/// Request payload for editing a snippet.
///
/// Absent fields are left untouched. `language_id: null` clears the language;
/// `tag_ids` replaces the whole tag set when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSnippetRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub language_id: Option<Option<LanguageId>>,
    pub tag_ids: Option<Vec<TagId>>,
}

/// Query parameters for searching snippets.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

// Distinguishes an explicit `null` from an absent field.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl Snippet {
    /// Build a snippet row from a validated insert payload.
    pub fn from_new(id: SnippetId, new: &NewSnippet) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: new.title.clone(),
            description: new.description.clone(),
            body: new.body.clone(),
            language_id: new.language_id,
            author_id: new.author_id,
            parent_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a fork of `self` owned by `author_id`.
    ///
    /// Content fields and the language are carried over; the fork gets its
    /// own id, fresh timestamps, and `parent_id` pointing at the source.
    pub fn fork(&self, id: SnippetId, author_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
            body: self.body.clone(),
            language_id: self.language_id,
            author_id,
            parent_id: Some(self.id),
            created_at: now,
            updated_at: now,
        }
    }
}
