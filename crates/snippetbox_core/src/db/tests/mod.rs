//! Database integration tests.

use super::snippet::Relation;
use super::*;
use crate::models::*;
use crate::test_support::{language, setup_temp_db, snippet, tag, user};

mod relations;

fn new_snippet(author_id: UserId, title: &str) -> NewSnippet {
    NewSnippet {
        title: title.to_string(),
        description: String::new(),
        body: String::new(),
        language_id: None,
        tag_ids: Vec::new(),
        author_id,
    }
}
