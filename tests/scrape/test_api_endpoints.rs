// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP API tests for /v1/scrape, / and /health
//!
//! These tests verify that:
//! - Successful scrapes return the text envelope with status 200
//! - Legacy field names are accepted on POST /
//! - Bad input maps to 400 and scrape failures to 422 with attempts
//! - Status endpoints describe every backend without secrets

use super::common::{router_with, StubBackend, CHALLENGE_HTML, JOB_HTML};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use scrape_router::api::{build_router, AppState};
use scrape_router::scrape::BackendId;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

/// Helper: app over the given stub backends
fn app(backends: &[Arc<StubBackend>]) -> Router {
    build_router(AppState::new(Arc::new(router_with(backends))))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_scrape_success() {
    let app = app(&[StubBackend::html(BackendId::Direct, JOB_HTML)]);

    let (status, json) = send(app, post_json("/v1/scrape", r#"{"url": "example.com/job"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["backend"], "direct");
    assert_eq!(json["classification"], "direct");
    assert_eq!(json["url"], "https://example.com/job");
    assert!(json.get("method").is_none());
    let text = json["text"].as_str().unwrap();
    assert_eq!(json["textLength"], text.chars().count());
    assert!(text.contains("Qualifications"));
}

#[tokio::test]
async fn test_root_accepts_legacy_fields() {
    let render = StubBackend::html(BackendId::HeadlessBrowserService, JOB_HTML);
    let app = app(&[StubBackend::html(BackendId::Direct, JOB_HTML), render.clone()]);

    let (status, json) = send(
        app,
        post_json("/", r#"{"website": "example.com/job", "force_js": true}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["backend"], "headless_browser");
    assert_eq!(json["method"], "headless_browser");
    assert_eq!(json["classification"], "js_render");
    assert_eq!(json["text_length"], json["textLength"]);
    assert_eq!(render.calls(), 1);
}

#[tokio::test]
async fn test_missing_url_is_400() {
    let app = app(&[StubBackend::html(BackendId::Direct, JOB_HTML)]);

    let (status, json) = send(app, post_json("/v1/scrape", "{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "ERROR_INVALID_INPUT");
    assert_eq!(json["message"], "url parameter required");
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let app = app(&[StubBackend::html(BackendId::Direct, JOB_HTML)]);

    let (status, json) = send(app, post_json("/v1/scrape", "not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "ERROR_INVALID_INPUT");
}

#[tokio::test]
async fn test_unsupported_scheme_is_400() {
    let direct = StubBackend::html(BackendId::Direct, JOB_HTML);
    let app = app(&[direct.clone()]);

    let (status, json) = send(
        app,
        post_json("/v1/scrape", r#"{"url": "ftp://example.com/job"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["url"], "ftp://example.com/job");
    assert_eq!(direct.calls(), 0);
}

#[tokio::test]
async fn test_unknown_backend_is_400() {
    let app = app(&[StubBackend::html(BackendId::Direct, JOB_HTML)]);

    let (status, json) = send(
        app,
        post_json("/v1/scrape", r#"{"url": "example.com", "backend": "curl"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("curl"));
}

#[tokio::test]
async fn test_js_render_required_is_422() {
    let direct = StubBackend::html(BackendId::Direct, JOB_HTML);
    let app = app(&[direct.clone()]);

    let (status, json) = send(
        app,
        post_json("/v1/scrape", r#"{"url": "https://jobs.lever.co/acme/42"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "ERROR_JAVASCRIPT_REQUIRED");
    let missing: Vec<&str> = json["missingSettings"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(missing.contains(&"BROWSERLESS_TOKEN"));
    assert_eq!(direct.calls(), 0);
}

#[tokio::test]
async fn test_blocked_is_422_with_attempts() {
    let app = app(&[
        StubBackend::html(BackendId::Direct, CHALLENGE_HTML),
        StubBackend::html(BackendId::WebUnlockerApi, CHALLENGE_HTML),
    ]);

    let (status, json) = send(
        app,
        post_json("/v1/scrape", r#"{"url": "example.com/job"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "ERROR_BLOCKED");
    let attempts = json["attempts"].as_array().unwrap();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0]["backend"], "direct");
    assert_eq!(attempts[0]["reason"], "Blocked");
    assert_eq!(attempts[1]["backend"], "web_unlocker_api");
}

#[tokio::test]
async fn test_health_describes_backends() {
    let app = app(&[StubBackend::html(BackendId::Direct, JOB_HTML)]);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "running");
    let backends = json["backends"].as_array().unwrap();
    assert_eq!(backends.len(), 5);
    assert_eq!(backends[0]["name"], "direct");
    assert_eq!(backends[0]["configured"], true);
    assert!(backends[1..].iter().all(|b| b["configured"] == false));
}

#[tokio::test]
async fn test_root_get_is_status() {
    let app = app(&[]);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "running");
    assert!(json["version"].is_string());
}
