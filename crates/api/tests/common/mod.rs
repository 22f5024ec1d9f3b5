//! Shared harness for API integration tests.
//!
//! Every app is backed by a fresh [`MemoryStore`] and the rule-based
//! assistant, so no database or network is needed. Clone the returned
//! router to send several requests against the same state.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use taskboard_api::config::{AssistantConfig, ServerConfig, StoreBackend};
use taskboard_api::router::build_app_router;
use taskboard_api::state::AppState;
use taskboard_board::assistant::{Assistant, RuleBasedProvider};
use taskboard_db::store::MemoryStore;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        store: StoreBackend::Memory,
        assistant: AssistantConfig::Rules,
    }
}

/// Build the full application router, with the production middleware stack,
/// over an empty in-memory store.
pub fn build_test_app() -> Router {
    let config = test_config();
    let state = AppState::new(
        MemoryStore::new().into(),
        Assistant::Rules(RuleBasedProvider),
        config.clone(),
    );
    build_app_router(state, &config).unwrap()
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Send a raw, possibly malformed, JSON body.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a project and return its id.
pub async fn create_project(app: &Router, name: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/projects",
        serde_json::json!({ "name": name, "description": format!("{name} description") }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a task and return its JSON representation.
pub async fn create_task(app: &Router, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app.clone(), "/api/v1/tasks", body).await;
    body_json(response).await["data"].clone()
}
