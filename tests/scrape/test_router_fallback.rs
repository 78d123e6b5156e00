// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Router fallback behaviour over counting stub backends
//!
//! These tests verify that:
//! - The first accepted payload wins and later backends are never called
//! - Rejected and failed attempts escalate along the plan in order
//! - Hosts needing JS rendering never touch non-rendering backends
//! - Aggregate failures are classified and explain every attempt

use super::common::{
    router_with, StubBackend, CHALLENGE_HTML, JOB_HTML, SHELL_HTML, THIN_HTML,
};
use scrape_router::scrape::{
    BackendId, FailureKind, FetchError, ReasonCode, RoutingClass, ScrapeError, ScrapeOptions,
};
use std::sync::Arc;

#[tokio::test]
async fn test_direct_page_accepted_without_escalation() {
    let direct = StubBackend::html(BackendId::Direct, JOB_HTML);
    let api = StubBackend::html(BackendId::WebUnlockerApi, JOB_HTML);
    let router = router_with(&[direct.clone(), api.clone()]);

    let outcome = router
        .scrape("example.com/job", ScrapeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.backend, "direct");
    assert_eq!(outcome.classification, RoutingClass::Direct);
    assert!(outcome.text.contains("Responsibilities"));
    assert!(!outcome.text.contains("Cookie policy"));
    assert_eq!(direct.calls(), 1);
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_thin_page_escalates_to_unlocker() {
    let direct = StubBackend::html(BackendId::Direct, THIN_HTML);
    let api = StubBackend::html(BackendId::WebUnlockerApi, JOB_HTML);
    let proxy = StubBackend::html(BackendId::WebUnlockerProxy, JOB_HTML);
    let router = router_with(&[direct.clone(), api.clone(), proxy.clone()]);

    let outcome = router
        .scrape("https://example.com/job", ScrapeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.backend, "web_unlocker_api");
    assert_eq!(outcome.attempts.len(), 2);
    assert_eq!(outcome.attempts[0].rejection(), Some(ReasonCode::TooShort));
    assert_eq!((direct.calls(), api.calls(), proxy.calls()), (1, 1, 0));
}

#[tokio::test]
async fn test_thin_everywhere_is_content_too_thin() {
    let direct = StubBackend::html(BackendId::Direct, THIN_HTML);
    let api = StubBackend::html(BackendId::WebUnlockerApi, "");
    let router = router_with(&[direct, api]);

    let err = router
        .scrape("example.com/job", ScrapeOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.classification(), FailureKind::ContentTooThin);
    assert_eq!(err.classification().code(), "ERROR_MINIMAL_CONTENT");
    let message = err.to_string();
    assert!(message.contains("direct: TooShort"));
    assert!(message.contains("web_unlocker_api: Empty"));
}

#[tokio::test]
async fn test_js_host_without_render_backend_is_not_fetched() {
    let direct = StubBackend::html(BackendId::Direct, JOB_HTML);
    let router = router_with(&[direct.clone()]);

    let err = router
        .scrape("https://jobs.lever.co/acme/123", ScrapeOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.classification(), FailureKind::JsRenderRequired);
    assert_eq!(direct.calls(), 0);
    assert!(matches!(err, ScrapeError::Configuration { .. }));
}

#[tokio::test]
async fn test_js_host_uses_render_service_first() {
    let render = StubBackend::html(BackendId::HeadlessBrowserService, JOB_HTML);
    let browser = StubBackend::html(BackendId::ScrapingBrowserProxy, JOB_HTML);
    let direct = StubBackend::html(BackendId::Direct, JOB_HTML);
    let router = router_with(&[direct.clone(), browser.clone(), render.clone()]);

    let outcome = router
        .scrape("boards.greenhouse.io/acme/jobs/1", ScrapeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.backend, "headless_browser");
    assert_eq!(outcome.classification, RoutingClass::JsRender);
    assert_eq!((render.calls(), browser.calls(), direct.calls()), (1, 0, 0));
}

#[tokio::test]
async fn test_lookalike_host_is_not_js_render() {
    let direct = StubBackend::html(BackendId::Direct, JOB_HTML);
    let router = router_with(&[direct.clone()]);

    let outcome = router
        .scrape("https://clever.co/careers", ScrapeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.classification, RoutingClass::Direct);
    assert_eq!(direct.calls(), 1);
}

#[tokio::test]
async fn test_unlocker_host_continues_past_block() {
    let browser = StubBackend::html(BackendId::ScrapingBrowserProxy, CHALLENGE_HTML);
    let api = StubBackend::html(BackendId::WebUnlockerApi, JOB_HTML);
    let direct = StubBackend::html(BackendId::Direct, JOB_HTML);
    let router = router_with(&[direct.clone(), api.clone(), browser.clone()]);

    let outcome = router
        .scrape("acme.wd5.myworkdayjobs.com/en-US/jobs/1", ScrapeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.classification, RoutingClass::Unlocker);
    assert_eq!(outcome.backend, "web_unlocker_api");
    assert_eq!(outcome.attempts[0].backend, "scraping_browser");
    assert_eq!(outcome.attempts[0].rejection(), Some(ReasonCode::Blocked));
    assert_eq!(direct.calls(), 0);
}

#[tokio::test]
async fn test_blocked_dominates_other_failures() {
    let direct = StubBackend::html(BackendId::Direct, CHALLENGE_HTML);
    let api = StubBackend::new(BackendId::WebUnlockerApi, Err(FetchError::HttpStatus(502)));
    let proxy = StubBackend::html(BackendId::WebUnlockerProxy, THIN_HTML);
    let router = router_with(&[direct, api, proxy]);

    let err = router
        .scrape("example.com/job", ScrapeOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.classification(), FailureKind::Blocked);
    let reasons: Vec<String> = err.attempts().iter().map(|a| a.reason_code()).collect();
    assert_eq!(reasons, vec!["Blocked", "HttpStatus(502)", "TooShort"]);
}

#[tokio::test]
async fn test_shell_only_page_rejected() {
    let direct = StubBackend::html(BackendId::Direct, SHELL_HTML);
    let router = router_with(&[direct]);

    let err = router
        .scrape("example.com/careers", ScrapeOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.classification(), FailureKind::AllBackendsFailed);
    assert!(err.to_string().contains("direct: ShellOnly"));
}

#[tokio::test]
async fn test_transport_failures_recorded_in_order() {
    let direct = StubBackend::new(
        BackendId::Direct,
        Err(FetchError::Network("connection reset".to_string())),
    );
    let api = StubBackend::new(
        BackendId::WebUnlockerApi,
        Err(FetchError::Timeout { timeout_secs: 60 }),
    );
    let router = router_with(&[direct, api]);

    let err = router
        .scrape("example.com/job", ScrapeOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.classification(), FailureKind::AllBackendsFailed);
    match err {
        ScrapeError::ScrapeFailure {
            attempts,
            last_error,
            routing,
            ..
        } => {
            assert_eq!(routing, RoutingClass::Direct);
            assert_eq!(attempts.len(), 2);
            assert_eq!(attempts[0].reason_code(), "NetworkError");
            assert_eq!(last_error.as_deref(), Some("timed out after 60s"));
        }
        other => panic!("expected scrape failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unavailable_backend_never_called() {
    let api = StubBackend::unavailable(BackendId::WebUnlockerApi);
    let direct = StubBackend::html(BackendId::Direct, THIN_HTML);
    let router = router_with(&[direct.clone(), api.clone()]);

    let err = router
        .scrape("example.com/job", ScrapeOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.attempts().len(), 1);
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let direct = StubBackend::html(BackendId::Direct, JOB_HTML);
    let render = StubBackend::html(BackendId::HeadlessBrowserService, THIN_HTML);
    let router = Arc::new(router_with(&[direct.clone(), render.clone()]));

    let requests = (0..8).map(|i| {
        let router = router.clone();
        async move {
            let url = if i % 2 == 0 {
                format!("example.com/job/{}", i)
            } else {
                format!("jobs.lever.co/acme/{}", i)
            };
            router.scrape(&url, ScrapeOptions::default()).await
        }
    });
    let results = futures::future::join_all(requests).await;

    for (i, result) in results.iter().enumerate() {
        if i % 2 == 0 {
            assert_eq!(result.as_ref().unwrap().backend, "direct");
        } else {
            let err = result.as_ref().unwrap_err();
            assert_eq!(err.classification(), FailureKind::ContentTooThin);
            assert_eq!(err.attempts().len(), 1);
        }
    }
    assert_eq!(direct.calls(), 4);
    assert_eq!(render.calls(), 4);
}
