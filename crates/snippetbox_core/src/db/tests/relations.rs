//! Collaborator and tag set membership.

use super::*;

#[test]
fn author_is_first_collaborator() {
    let (db, _temp) = setup_temp_db();
    let ada = user(&db, "ada");
    let created = snippet(&db, &ada, "x");
    assert_eq!(
        db.snippets
            .member_ids(created.id, Relation::Collaborator)
            .expect("users"),
        vec![ada.id]
    );
}

#[test]
fn membership_is_a_set() {
    let (db, _temp) = setup_temp_db();
    let ada = user(&db, "ada");
    let bob = user(&db, "bob");
    let rust = tag(&db, "rust");
    let created = snippet(&db, &ada, "x");

    assert!(db
        .snippets
        .add_member(created.id, Relation::Collaborator, bob.id)
        .expect("add"));
    assert!(!db
        .snippets
        .add_member(created.id, Relation::Collaborator, bob.id)
        .expect("add twice"));
    assert!(db
        .snippets
        .add_member(created.id, Relation::Tag, rust.id)
        .expect("add tag"));
    assert!(!db
        .snippets
        .add_member(created.id, Relation::Tag, rust.id)
        .expect("add tag twice"));

    assert_eq!(
        db.snippets
            .member_ids(created.id, Relation::Collaborator)
            .expect("users"),
        vec![ada.id, bob.id]
    );
    assert_eq!(
        db.snippets
            .member_ids(created.id, Relation::Tag)
            .expect("tags"),
        vec![rust.id]
    );

    assert!(db
        .snippets
        .remove_member(created.id, Relation::Collaborator, bob.id)
        .expect("remove"));
    assert!(!db
        .snippets
        .remove_member(created.id, Relation::Collaborator, bob.id)
        .expect("remove twice"));
}

#[test]
fn add_member_validates_both_sides() {
    let (db, _temp) = setup_temp_db();
    let ada = user(&db, "ada");
    let id = snippet(&db, &ada, "x").id;

    assert!(matches!(
        db.snippets.add_member(404, Relation::Collaborator, ada.id),
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        db.snippets.add_member(id, Relation::Collaborator, 404),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        db.snippets.add_member(id, Relation::Tag, 404),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        db.snippets.remove_member(404, Relation::Tag, 1),
        Err(AppError::NotFound)
    ));
}

#[test]
fn update_replaces_tag_set_and_language() {
    let (db, _temp) = setup_temp_db();
    let ada = user(&db, "ada");
    let a = tag(&db, "a");
    let b = tag(&db, "b");
    let c = tag(&db, "c");
    let rust = language(&db, "Rust");

    let mut new = new_snippet(ada.id, "x");
    new.tag_ids = vec![a.id, b.id];
    let created = db.snippets.create(&new).expect("create");

    let updated = db
        .snippets
        .update(
            created.id,
            &UpdateSnippetRequest {
                tag_ids: Some(vec![b.id, c.id, c.id]),
                language_id: Some(Some(rust.id)),
                ..UpdateSnippetRequest::default()
            },
        )
        .expect("update")
        .expect("exists");
    assert_eq!(updated.language_id, Some(rust.id));
    assert_eq!(
        db.snippets
            .member_ids(created.id, Relation::Tag)
            .expect("tags"),
        vec![b.id, c.id]
    );
    assert!(db.tags.snippet_ids(a.id).expect("index").is_empty());

    let cleared = db
        .snippets
        .update(
            created.id,
            &UpdateSnippetRequest {
                language_id: Some(None),
                ..UpdateSnippetRequest::default()
            },
        )
        .expect("update")
        .expect("exists");
    assert!(cleared.language_id.is_none());
    assert!(db.languages.delete(rust.id).expect("delete language"));
}

#[test]
fn delete_removes_reverse_index_entries() {
    let (db, _temp) = setup_temp_db();
    let ada = user(&db, "ada");
    let rust = tag(&db, "rust");
    let mut new = new_snippet(ada.id, "x");
    new.tag_ids = vec![rust.id];
    let created = db.snippets.create(&new).expect("create");

    db.snippets.delete(created.id).expect("delete");
    assert!(db.tags.snippet_ids(rust.id).expect("index").is_empty());
    assert!(db.snippets.for_user(ada.id).expect("profile").is_empty());
}
