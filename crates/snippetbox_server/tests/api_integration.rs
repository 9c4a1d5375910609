//! Integration tests for the SnippetBox HTTP API.

mod support;

use axum::http::StatusCode;
use serde_json::{json, Value};
use support::{create_snippet, login, setup_test_server, TEST_MAX_SNIPPET_SIZE};

#[tokio::test]
async fn test_snippet_lifecycle() {
    let (server, _temp) = setup_test_server();
    let (token, user_id) = login(&server, "ada").await;

    let created = create_snippet(
        &server,
        &token,
        json!({ "title": "Hello", "body": "print('hi')" }),
    )
    .await;
    let id = created["id"].as_u64().expect("id");
    assert_eq!(created["author_id"], user_id);
    assert!(created["parent_id"].is_null());

    let detail: Value = server.get(&format!("/snippets/{}", id)).await.json();
    assert_eq!(detail["title"], "Hello");
    assert_eq!(detail["users"][0]["username"], "ada");
    assert_eq!(detail["forks"], 0);

    let listed: Value = server.get("/").await.json();
    assert_eq!(listed.as_array().expect("array").len(), 1);

    let edited = server
        .post(&format!("/snippets/{}/edit/", id))
        .authorization_bearer(&token)
        .json(&json!({ "title": "New" }))
        .await;
    edited.assert_status_ok();
    let edited: Value = edited.json();
    assert_eq!(edited["title"], "New");
    assert_eq!(edited["body"], "print('hi')");

    server
        .post(&format!("/snippets/{}/delete/", id))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/snippets/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anonymous_mutations_are_unauthorized() {
    let (server, _temp) = setup_test_server();
    let (token, _) = login(&server, "ada").await;
    let created = create_snippet(&server, &token, json!({ "title": "x" })).await;
    let id = created["id"].as_u64().expect("id");

    let edit = server
        .post(&format!("/snippets/{}/edit/", id))
        .json(&json!({ "title": "y" }))
        .await;
    edit.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = edit.json();
    assert!(body["error"].is_string());

    for path in [
        format!("/snippets/{}/delete/", id),
        format!("/snippets/{}/copy/", id),
        "/snippets/999/delete/".to_string(),
        "/languages/999/delete/".to_string(),
        "/tags/999/delete/".to_string(),
    ] {
        server
            .post(&path)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
    server
        .post("/snippets/new")
        .json(&json!({ "title": "x" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/profile")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_bearer_token_is_rejected_on_every_route() {
    let (server, _temp) = setup_test_server();
    server
        .get("/")
        .authorization_bearer("not-a-session")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/tags/list")
        .add_header(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_static("Basic Zm9vOmJhcg=="),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let (server, _temp) = setup_test_server();
    let (token, _) = login(&server, "ada").await;
    server
        .get("/profile")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
    server
        .delete("/sessions")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get("/profile")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .delete("/sessions")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_author_edit_is_forbidden() {
    let (server, _temp) = setup_test_server();
    let (u1, _) = login(&server, "u1").await;
    let (u2, _) = login(&server, "u2").await;
    let b = create_snippet(&server, &u1, json!({ "title": "B" })).await;
    let id = b["id"].as_u64().expect("id");

    server
        .post(&format!("/snippets/{}/edit/", id))
        .authorization_bearer(&u2)
        .json(&json!({ "title": "Stolen" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .post(&format!("/snippets/{}/delete/", id))
        .authorization_bearer(&u2)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    server
        .post(&format!("/snippets/{}/edit/", id))
        .authorization_bearer(&u1)
        .json(&json!({ "title": "New" }))
        .await
        .assert_status_ok();
    let fetched: Value = server.get(&format!("/snippets/{}", id)).await.json();
    assert_eq!(fetched["title"], "New");
}

#[tokio::test]
async fn test_fork_survives_parent_delete() {
    let (server, _temp) = setup_test_server();
    let (u1, u1_id) = login(&server, "u1").await;
    let a = create_snippet(&server, &u1, json!({ "title": "Hello" })).await;
    let a_id = a["id"].as_u64().expect("id");

    let fork = server
        .post(&format!("/snippets/{}/copy/", a_id))
        .authorization_bearer(&u1)
        .await;
    fork.assert_status(StatusCode::CREATED);
    let fork: Value = fork.json();
    let fork_id = fork["id"].as_u64().expect("fork id");
    assert_eq!(fork["parent_id"], a_id);

    let forks_url = format!("/snippets/{}/forks", a_id);
    let forks: Value = server.get(&forks_url).await.json();
    assert_eq!(forks[0]["id"], fork_id);

    server
        .post(&format!("/snippets/{}/delete/", a_id))
        .authorization_bearer(&u1)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let fetched = server.get(&format!("/snippets/{}", fork_id)).await;
    fetched.assert_status_ok();
    let fetched: Value = fetched.json();
    assert!(fetched["parent_id"].is_null());
    assert_eq!(fetched["author_id"], u1_id);
    assert_eq!(fetched["title"], "Hello");
}

#[tokio::test]
async fn test_fork_by_other_user_copies_tags_independently() {
    let (server, _temp) = setup_test_server();
    let (owner, _) = login(&server, "owner").await;
    let (other, other_id) = login(&server, "other").await;

    let tag: Value = server
        .post("/tags/new")
        .authorization_bearer(&owner)
        .json(&json!({ "name": "cli" }))
        .await
        .json();
    let tag_id = tag["id"].as_u64().expect("tag id");
    let source = create_snippet(
        &server,
        &owner,
        json!({ "title": "s", "tag_ids": [tag_id] }),
    )
    .await;
    let source_id = source["id"].as_u64().expect("id");

    let fork: Value = server
        .post(&format!("/snippets/{}/copy/", source_id))
        .authorization_bearer(&other)
        .await
        .json();
    assert_eq!(fork["author_id"], other_id);
    let fork_id = fork["id"].as_u64().expect("fork id");

    server
        .post(&format!("/snippets/{}/edit/", fork_id))
        .authorization_bearer(&other)
        .json(&json!({ "tag_ids": [] }))
        .await
        .assert_status_ok();

    let source_detail: Value = server.get(&format!("/snippets/{}", source_id)).await.json();
    assert_eq!(source_detail["tags"][0]["name"], "cli");
    let fork_detail: Value = server.get(&format!("/snippets/{}", fork_id)).await.json();
    assert_eq!(fork_detail["tags"], json!([]));
}

#[tokio::test]
async fn test_search_matches_each_predicate() {
    let (server, _temp) = setup_test_server();
    let (token, _) = login(&server, "ada").await;

    let language: Value = server
        .post("/languages/new")
        .authorization_bearer(&token)
        .json(&json!({ "name": "ABCLang" }))
        .await
        .json();
    let tag: Value = server
        .post("/tags/new")
        .authorization_bearer(&token)
        .json(&json!({ "name": "xabcx" }))
        .await
        .json();

    create_snippet(&server, &token, json!({ "title": "the abc title" })).await;
    create_snippet(
        &server,
        &token,
        json!({ "title": "two", "description": "has ABC inside" }),
    )
    .await;
    create_snippet(
        &server,
        &token,
        json!({ "title": "three", "tag_ids": [tag["id"]] }),
    )
    .await;
    create_snippet(
        &server,
        &token,
        json!({ "title": "four", "language_id": language["id"] }),
    )
    .await;
    create_snippet(&server, &token, json!({ "title": "five", "body": "abc" })).await;

    let hits = server.get("/search").add_query_param("q", "abc").await;
    let hits: Value = hits.json();
    let titles: Vec<&str> = hits
        .as_array()
        .expect("array")
        .iter()
        .map(|s| s["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["the abc title", "two", "three", "four"]);

    let empty: Value = server.get("/search").await.json();
    assert_eq!(empty, json!([]));
}

#[tokio::test]
async fn test_language_delete_clears_snippet_language() {
    let (server, _temp) = setup_test_server();
    let (token, _) = login(&server, "ada").await;
    let language: Value = server
        .post("/languages/new")
        .authorization_bearer(&token)
        .json(&json!({ "name": "Rust" }))
        .await
        .json();
    let language_id = language["id"].as_u64().expect("id");

    let renamed = server
        .post(&format!("/languages/{}/edit/", language_id))
        .authorization_bearer(&token)
        .json(&json!({ "name": "Rust 2021" }))
        .await;
    renamed.assert_status_ok();
    let listed: Value = server.get("/languages/list").await.json();
    assert_eq!(listed[0]["name"], "Rust 2021");

    let snippet = create_snippet(
        &server,
        &token,
        json!({ "title": "x", "language_id": language_id }),
    )
    .await;
    let detail: Value = server
        .get(&format!("/snippets/{}", snippet["id"]))
        .await
        .json();
    assert_eq!(detail["language"]["name"], "Rust 2021");

    server
        .post(&format!("/languages/{}/delete/", language_id))
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/languages/{}", language_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    let detail: Value = server
        .get(&format!("/snippets/{}", snippet["id"]))
        .await
        .json();
    assert!(detail["language_id"].is_null());
    assert!(detail["language"].is_null());
}

#[tokio::test]
async fn test_collaborators_and_profile() {
    let (server, _temp) = setup_test_server();
    let (ada, _) = login(&server, "ada").await;
    let (bob, bob_id) = login(&server, "bob").await;
    let shared = create_snippet(&server, &ada, json!({ "title": "shared" })).await;
    let shared_id = shared["id"].as_u64().expect("id");

    server
        .post(&format!("/snippets/{}/users/{}", shared_id, bob_id))
        .authorization_bearer(&bob)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    let users: Value = server
        .post(&format!("/snippets/{}/users/{}", shared_id, bob_id))
        .authorization_bearer(&ada)
        .await
        .json();
    assert_eq!(users.as_array().expect("array").len(), 2);

    create_snippet(&server, &bob, json!({ "title": "own" })).await;
    let profile: Value = server
        .get("/profile")
        .authorization_bearer(&bob)
        .await
        .json();
    let titles: Vec<&str> = profile
        .as_array()
        .expect("array")
        .iter()
        .map(|s| s["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["shared", "own"]);

    server
        .delete(&format!("/snippets/{}/users/{}", shared_id, bob_id))
        .authorization_bearer(&ada)
        .await
        .assert_status_ok();
    let profile: Value = server
        .get("/profile")
        .authorization_bearer(&bob)
        .await
        .json();
    assert_eq!(profile.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn test_validation_errors_are_bad_requests() {
    let (server, _temp) = setup_test_server();
    let (token, _) = login(&server, "ada").await;

    server
        .post("/snippets/new")
        .authorization_bearer(&token)
        .json(&json!({ "title": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .post("/snippets/new")
        .authorization_bearer(&token)
        .json(&json!({ "title": "x", "tag_ids": [42] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let oversized = "a".repeat(TEST_MAX_SNIPPET_SIZE + 1);
    let response = server
        .post("/snippets/new")
        .authorization_bearer(&token)
        .json(&json!({ "title": "big", "body": oversized }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .expect("message")
        .contains("maximum"));

    server
        .post("/sessions")
        .json(&json!({ "username": "" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_requests_get_json_errors() {
    let (server, _temp) = setup_test_server();
    let (token, _) = login(&server, "ada").await;

    let bad_id = server.get("/snippets/abc").await;
    bad_id.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = bad_id.json();
    assert!(body["error"].is_string());

    let bad_json = server
        .post("/snippets/new")
        .authorization_bearer(&token)
        .text("{\"title\": ")
        .content_type("application/json")
        .await;
    bad_json.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = bad_json.json();
    assert!(body["error"].is_string());

    let not_json = server
        .post("/tags/new")
        .authorization_bearer(&token)
        .text("name=cli")
        .await;
    not_json.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = not_json.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_tag_snippets_lists_tagged_snippets() {
    let (server, _temp) = setup_test_server();
    let (token, _) = login(&server, "ada").await;

    let tag: Value = server
        .post("/tags/new")
        .authorization_bearer(&token)
        .json(&json!({ "name": "cli" }))
        .await
        .json();
    let tag_id = tag["id"].as_u64().expect("tag id");
    let tagged = json!({ "title": "a", "tag_ids": [tag_id] });
    let tagged = create_snippet(&server, &token, tagged).await;
    create_snippet(&server, &token, json!({ "title": "b" })).await;

    let url = format!("/tags/{}/snippets", tag_id);
    let listed: Value = server.get(&url).await.json();
    let listed = listed.as_array().expect("array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], tagged["id"]);

    server
        .get("/tags/999/snippets")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let (server, _temp) = setup_test_server();
    let response = server.get("/tags/list").await;
    response.assert_status_ok();
    response.assert_header("x-content-type-options", "nosniff");
    response.assert_header("x-frame-options", "DENY");
}
