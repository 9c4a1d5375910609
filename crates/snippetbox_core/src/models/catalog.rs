//! Language and tag classification models.

use super::{LanguageId, TagId};
use serde::{Deserialize, Serialize};

/// Programming language a snippet may be classified under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Language {
    pub id: LanguageId,
    pub name: String,
}

/// Free-form label attached to snippets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// Request payload for creating or renaming a language.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageRequest {
    pub name: String,
}

/// Request payload for creating or renaming a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct TagRequest {
    pub name: String,
}
