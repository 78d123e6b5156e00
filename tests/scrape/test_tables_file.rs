// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Routing tables loaded from TOML files on disk

use super::common::{router_with, StubBackend, JOB_HTML};
use scrape_router::scrape::{
    BackendId, FailureKind, RoutingClass, RoutingTables, ScrapeConfig, ScrapeOptions,
    ScrapeRouter, TablesError,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_tables(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("routing.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_tables(
        &dir,
        r#"
js_render_domains = ["Careers.Acme.test", "  .spa-jobs.test "]
"#,
    );

    let tables = RoutingTables::load(&path).unwrap();
    assert_eq!(
        tables.js_render_domains,
        vec!["careers.acme.test".to_string(), "spa-jobs.test".to_string()]
    );
    assert_eq!(tables.unlocker_domains, RoutingTables::default().unlocker_domains);
    assert!(tables.blocked_phrases.contains(&"captcha".to_string()));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = RoutingTables::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, TablesError::Io { .. }));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_tables(&dir, "js_render_domains = \"not-a-list\"");
    let err = RoutingTables::load(&path).unwrap_err();
    assert!(matches!(err, TablesError::Parse { .. }));
    assert!(err.to_string().contains("routing.toml"));
}

#[tokio::test]
async fn test_router_from_config_uses_tables_file() {
    let dir = TempDir::new().unwrap();
    let path = write_tables(&dir, r#"unlocker_domains = ["hardened.test"]"#);

    let config = ScrapeConfig {
        tables_path: Some(path),
        ..ScrapeConfig::default()
    };
    let router = ScrapeRouter::from_config(&config).unwrap();

    assert_eq!(
        router.classify("jobs.hardened.test/1", false).await.unwrap(),
        RoutingClass::Unlocker
    );
    // Only the direct backend exists, so the unlocker plan is empty
    let err = router
        .scrape("jobs.hardened.test/1", ScrapeOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.classification(), FailureKind::BackendNotConfigured);
}

#[tokio::test]
async fn test_router_from_config_rejects_missing_tables_file() {
    let dir = TempDir::new().unwrap();
    let config = ScrapeConfig {
        tables_path: Some(dir.path().join("nope.toml")),
        ..ScrapeConfig::default()
    };
    assert!(ScrapeRouter::from_config(&config).is_err());
}

#[tokio::test]
async fn test_reload_from_file_reroutes_host() {
    let dir = TempDir::new().unwrap();
    let direct = StubBackend::html(BackendId::Direct, JOB_HTML);
    let router = router_with(&[direct.clone()]);

    router
        .scrape("careers.acme.test/backend", ScrapeOptions::default())
        .await
        .unwrap();
    assert_eq!(direct.calls(), 1);

    let path = write_tables(&dir, r#"js_render_domains = ["acme.test"]"#);
    router.reload_tables_from(&path).await.unwrap();

    let err = router
        .scrape("careers.acme.test/backend", ScrapeOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.classification(), FailureKind::JsRenderRequired);
    assert_eq!(direct.calls(), 1);
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_tables() {
    let dir = TempDir::new().unwrap();
    let router = router_with(&[StubBackend::html(BackendId::Direct, JOB_HTML)]);
    let path = write_tables(&dir, "unlocker_domains = [");

    assert!(router.reload_tables_from(&path).await.is_err());
    assert_eq!(
        router.classify("jobs.lever.co/acme", false).await.unwrap(),
        RoutingClass::JsRender
    );
}
