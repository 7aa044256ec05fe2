//! End-to-end tests for the REST API.
//!
//! Drives the full router (session auth included) over an in-memory
//! store, asserting the wire contract: status codes, error codes, and
//! response envelopes.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use memento_core::SqliteStore;
use memento_server::{create_server, AppState, ServerConfig};

fn app() -> Router {
    let store = SqliteStore::in_memory().unwrap();
    let state = AppState::with_store(store, &ServerConfig::default());
    create_server(state, None)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Register a user and open a session; returns (token, user_id).
async fn login_as(app: &Router, name: &str, email: &str) -> (String, String) {
    let (status, _) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

async fn create_memory(app: &Router, token: &str, content: &str, tags: Value) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/memories",
        Some(token),
        Some(json!({ "content": content, "tags": tags })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["memory"].clone()
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = app();
    let (token, user_id) = login_as(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(&app, Method::GET, "/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], Value::String(user_id));
    assert_eq!(body["user"]["name"], "Ada");

    let (status, _) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Bad credentials never open a session.
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_writes_require_a_session() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/memories",
        None,
        Some(json!({ "content": "anonymous" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::DELETE, "/memories/some-id", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_read_memory() {
    let app = app();
    let (token, user_id) = login_as(&app, "Ada", "ada@example.com").await;

    let memory = create_memory(&app, &token, "first note", json!(["diary"])).await;
    assert_eq!(memory["userId"].as_str().unwrap(), user_id);
    assert_eq!(memory["content"], "first note");
    assert_eq!(memory["tags"], json!(["diary"]));

    // Reads are public: no token needed.
    let uri = format!("/memories/{}", memory["id"].as_str().unwrap());
    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["memory"]["content"], "first note");

    let (status, body) = send(&app, Method::GET, "/memories/missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "MEMORY_NOT_FOUND");
}

#[tokio::test]
async fn test_create_requires_content() {
    let app = app();
    let (token, _) = login_as(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/memories",
        Some(&token),
        Some(json!({ "title": "no body" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "CONTENT_REQUIRED");
}

#[tokio::test]
async fn test_listing_pagination_and_owner_annotation() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/memories", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NO_MEMORIES");

    let (token, _) = login_as(&app, "Ada", "ada@example.com").await;
    for i in 0..5 {
        create_memory(&app, &token, &format!("note {i}"), json!([])).await;
    }

    let (status, body) = send(&app, Method::GET, "/memories?page=3&limit=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let memories = body["memories"].as_array().unwrap();
    assert_eq!(memories.len(), 1);
    assert_eq!(memories[0]["content"], "note 0");
    assert_eq!(memories[0]["user"]["name"], "Ada");

    let (status, body) = send(&app, Method::GET, "/memories?page=4&limit=2", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "PAGE_OUT_OF_RANGE");
}

#[tokio::test]
async fn test_listing_with_tag_filter() {
    let app = app();
    let (token, _) = login_as(&app, "Ada", "ada@example.com").await;
    create_memory(&app, &token, "tagged", json!(["travel"])).await;
    create_memory(&app, &token, "untagged", json!([])).await;

    let (status, body) = send(&app, Method::GET, "/memories?tags=travel,food", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let memories = body["memories"].as_array().unwrap();
    assert_eq!(memories.len(), 1);
    assert_eq!(memories[0]["content"], "tagged");
}

#[tokio::test]
async fn test_only_the_owner_may_update_or_delete() {
    let app = app();
    let (ada_token, _) = login_as(&app, "Ada", "ada@example.com").await;
    let (eve_token, _) = login_as(&app, "Eve", "eve@example.com").await;

    let memory = create_memory(&app, &ada_token, "ada's note", json!([])).await;
    let uri = format!("/memories/{}", memory["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&eve_token),
        Some(json!({ "content": "defaced" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "NOT_AUTHORIZED");

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&eve_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "NOT_AUTHORIZED");

    // Missing records are reported as such, before authorization.
    let (status, body) =
        send(&app, Method::DELETE, "/memories/ghost", Some(&eve_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "MEMORY_NOT_FOUND");

    // The owner succeeds.
    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&ada_token),
        Some(json!({ "title": "kept" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["memory"]["title"], "kept");
    assert_eq!(body["memory"]["content"], "ada's note");

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&ada_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Memory deleted successfully.");

    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_contract() {
    let app = app();
    let (token, _) = login_as(&app, "Ada", "ada@example.com").await;
    create_memory(&app, &token, "Dinner in Lisbon", json!([])).await;
    create_memory(&app, &token, "lisbon by night", json!([])).await;
    create_memory(&app, &token, "unrelated", json!([])).await;

    let (status, body) = send(&app, Method::GET, "/memories/search", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "QUERY_REQUIRED");

    let (status, body) = send(
        &app,
        Method::GET,
        "/memories/search?query=LISBON&page=1&limit=1",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalMemories"], 2);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["memories"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::GET,
        "/memories/search?query=nothing-matches",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NO_MEMORIES");
}

#[tokio::test]
async fn test_owner_listing() {
    let app = app();
    let (ada_token, ada_id) = login_as(&app, "Ada", "ada@example.com").await;
    let (eve_token, _) = login_as(&app, "Eve", "eve@example.com").await;
    create_memory(&app, &ada_token, "ada 1", json!([])).await;
    create_memory(&app, &ada_token, "ada 2", json!([])).await;
    create_memory(&app, &eve_token, "eve 1", json!([])).await;

    let uri = format!("/users/{ada_id}/memories");
    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let memories = body["memories"].as_array().unwrap();
    assert_eq!(memories.len(), 2);
    assert!(memories
        .iter()
        .all(|m| m["userId"].as_str().unwrap() == ada_id));

    let (status, body) = send(&app, Method::GET, "/users/nobody/memories", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NO_MEMORIES");
}

#[tokio::test]
async fn test_duplicate_registration_is_a_conflict() {
    let app = app();
    login_as(&app, "Ada", "ada@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": "Imposter", "email": "ada@example.com", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "EMAIL_TAKEN");
}
