//! Shared test-only helpers for snippetbox_core.

use crate::models::{Language, NewSnippet, Snippet, Tag, User};
use crate::Database;
use tempfile::TempDir;

/// Creates an isolated temporary database under `<tempdir>/db`.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

pub(crate) fn user(db: &Database, name: &str) -> User {
    db.users.get_or_create(name).expect("create user")
}

pub(crate) fn language(db: &Database, name: &str) -> Language {
    db.languages.create(name).expect("create language")
}

pub(crate) fn tag(db: &Database, name: &str) -> Tag {
    db.tags.create(name).expect("create tag")
}

pub(crate) fn snippet(db: &Database, author: &User, title: &str) -> Snippet {
    db.snippets
        .create(&NewSnippet {
            title: title.to_string(),
            description: String::new(),
            body: String::new(),
            language_id: None,
            tag_ids: Vec::new(),
            author_id: author.id,
        })
        .expect("create snippet")
}
