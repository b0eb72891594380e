#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use consentry_api::auth::jwt::{generate_access_token, JwtConfig, JwtIdentityResolver};
use consentry_api::config::{ServerConfig, StoreBackend};
use consentry_api::router::build_app_router;
use consentry_api::state::AppState;
use consentry_core::engine::ModerationEngine;
use consentry_core::memory::InMemoryStore;
use consentry_core::roles::Role;
use consentry_core::store::ModerationStore;
use consentry_core::types::DbId;

pub const PERFORMER_ID: DbId = 10;
pub const OTHER_PERFORMER_ID: DbId = 11;
pub const SAFETY_ID: DbId = 20;
pub const MODERATOR_ID: DbId = 30;
pub const ADMIN_ID: DbId = 40;
pub const CLIENT_ID: DbId = 50;

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        jwt: jwt_config(),
    }
}

/// Full application router over a fresh in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with_store(Arc::new(InMemoryStore::new()))
}

/// Full application router over `store`, with the production middleware stack.
pub fn build_test_app_with_store(store: Arc<dyn ModerationStore>) -> Router {
    let config = test_config();
    let state = AppState {
        engine: ModerationEngine::new(store),
        identity: Arc::new(JwtIdentityResolver::new(config.jwt.clone())),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Bearer token for `id` acting as `role`.
pub fn token(id: DbId, role: Role) -> String {
    generate_access_token(id, role, &jwt_config()).unwrap()
}

pub fn performer() -> String {
    token(PERFORMER_ID, Role::Performer)
}

pub fn safety() -> String {
    token(SAFETY_ID, Role::SafetyOfficer)
}

pub fn moderator() -> String {
    token(MODERATOR_ID, Role::Moderator)
}

pub fn admin() -> String {
    token(ADMIN_ID, Role::Admin)
}

pub fn client() -> String {
    token(CLIENT_ID, Role::Client)
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Create a draft as the default performer and return its id.
pub async fn create_draft(app: &Router, title: &str) -> DbId {
    let response = post_json(
        app,
        "/api/v1/content",
        Some(&performer()),
        serde_json::json!({ "title": title, "tags": ["live"], "price_cents": 2500 }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["content"]["id"]
        .as_i64()
        .unwrap()
}

/// Create and submit a draft, returning its id.
pub async fn create_in_review(app: &Router, title: &str) -> DbId {
    let id = create_draft(app, title).await;
    let response = post_json(
        app,
        &format!("/api/v1/content/{id}/submit"),
        Some(&performer()),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    id
}
