//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use serde_json::{json, Value};
use snippetbox_server::{create_app, AppState, Config, Database};
use std::path::Path;
use tempfile::TempDir;

pub(crate) const TEST_MAX_SNIPPET_SIZE: usize = 4096;

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        max_snippet_size: TEST_MAX_SNIPPET_SIZE,
        auto_backup: false,
    }
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config_for_db_path(&temp_dir.path().join("db"));
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let app = create_app(AppState::new(config, db), false);
    let server = TestServer::new(app).expect("server");
    (server, temp_dir)
}

/// Log in as `username` and return `(token, user_id)`.
pub(crate) async fn login(server: &TestServer, username: &str) -> (String, u64) {
    let response = server
        .post("/sessions")
        .json(&json!({ "username": username }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    let token = body["token"].as_str().expect("token").to_string();
    let user_id = body["user"]["id"].as_u64().expect("user id");
    (token, user_id)
}

/// Create a snippet as the holder of `token` and return its JSON.
pub(crate) async fn create_snippet(server: &TestServer, token: &str, body: Value) -> Value {
    let response = server
        .post("/snippets/new")
        .authorization_bearer(token)
        .json(&body)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}
