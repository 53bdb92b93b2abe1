#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use filmcraft_api::auth::jwt::JwtConfig;
use filmcraft_api::config::ServerConfig;
use filmcraft_api::router::build_app_router;
use filmcraft_api::state::AppState;
use filmcraft_api::storage::LocalObjectStore;
use filmcraft_api::ws::WsManager;
use filmcraft_core::storage::MAX_IMAGE_BYTES;
use filmcraft_events::EventBus;

pub const TEST_PASSWORD: &str = "secret-password";
pub const PUBLIC_BASE_URL: &str = "http://files.test";

/// Build a test `ServerConfig` with safe defaults and a per-test storage root.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        storage_root: test_storage_root(),
        public_base_url: PUBLIC_BASE_URL.to_string(),
        max_upload_bytes: MAX_IMAGE_BYTES,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

fn test_storage_root() -> PathBuf {
    std::env::temp_dir().join(format!("filmcraft-test-{}", uuid::Uuid::new_v4()))
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Same stack as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool, Arc::new(EventBus::default()))
}

/// Like [`build_test_app`], but with a caller-owned event bus so tests can
/// observe published changes.
pub fn build_test_app_with_bus(pool: PgPool, event_bus: Arc<EventBus>) -> Router {
    build_test_app_with(pool, event_bus, Arc::new(WsManager::new()))
}

/// Like [`build_test_app`], but with a caller-owned WebSocket manager so
/// tests can inspect realtime subscriptions.
pub fn build_test_app_with_ws(pool: PgPool, ws_manager: Arc<WsManager>) -> Router {
    build_test_app_with(pool, Arc::new(EventBus::default()), ws_manager)
}

fn build_test_app_with(pool: PgPool, event_bus: Arc<EventBus>, ws_manager: Arc<WsManager>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        object_store: Arc::new(LocalObjectStore::new(config.storage_root.clone())),
        config: Arc::new(config.clone()),
        ws_manager,
        event_bus,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Send a multipart body with a single `file` part.
pub async fn upload_auth(
    app: Router,
    method: Method,
    uri: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
    token: &str,
) -> Response {
    let boundary = "filmcraft-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Sign up through the API and return `(access_token, user_id)`.
pub async fn signup(app: &Router, email: &str) -> (String, i64) {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/signup",
        json!({ "email": email, "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "signup should succeed");
    let json = body_json(response).await;
    (
        json["access_token"].as_str().unwrap().to_string(),
        json["user"]["id"].as_i64().unwrap(),
    )
}

/// A completed ideation draft.
pub fn ideation_body(title: &str) -> Value {
    json!({
        "title": title,
        "project_type": "Short Film",
        "duration": "5 minutes",
        "concept": "A lighthouse keeper's last night",
        "key_message": "Letting go is a kind of light",
        "target_audience": "Festival audiences",
        "tone": "Melancholic",
    })
}

/// Create a project through the API and return its id.
pub async fn create_project(app: &Router, token: &str, title: &str) -> i64 {
    let response = post_json_auth(app.clone(), "/api/v1/projects", ideation_body(title), token).await;
    assert_eq!(response.status(), StatusCode::CREATED, "project create should succeed");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Smallest valid PNG: the 8-byte signature plus an IHDR chunk header.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0, 0, 0, 13, b'I', b'H', b'D', b'R']);
    bytes.extend_from_slice(&[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0]);
    bytes
}
