// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fixtures: counting stub backends, sample pages and a local HTTP server

use async_trait::async_trait;
use axum::Router;
use scrape_router::scrape::{
    BackendId, BackendRegistry, FetchBackend, FetchError, FetchedPage, RoutingTables,
    ScrapeRouter, ValidationThresholds,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

/// A realistic job posting, comfortably above every length threshold
pub const JOB_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Backend Engineer - Example Corp</title></head>
<body>
  <header>Example Corp</header>
  <nav>Home | Careers | Sign in</nav>
  <main>
    <h1>Backend Engineer</h1>
    <p>Example Corp is hiring a backend engineer to build the services behind our
    logistics platform. You will work with a small team shipping features every week.</p>
    <h2>Responsibilities</h2>
    <ul>
      <li>Design and operate HTTP services in Rust</li>
      <li>Own the reliability of the order pipeline</li>
    </ul>
    <h2>Qualifications</h2>
    <ul><li>Three years building production systems</li></ul>
  </main>
  <footer>Cookie policy | Privacy policy</footer>
</body>
</html>"#;

/// Loads fine but carries almost no text
pub const THIN_HTML: &str =
    r#"<html><body><div id="app"><p>Please wait</p></div></body></html>"#;

/// A bot-challenge interstitial
pub const CHALLENGE_HTML: &str = r#"<html><head><title>Just a moment...</title></head><body>
  <p>Checking your browser before accessing the website. This process is automatic and
  your browser will redirect to the requested content shortly. Please verify you are human.</p>
</body></html>"#;

/// Navigation, legal links and login prompts without the posting itself
pub const SHELL_HTML: &str = r#"<html><body><div class="page">
  <p>Welcome to the careers portal of a large company with many open roles worldwide.</p>
  <p>Sign in to see personalised recommendations or create account today.</p>
  <p>Read our cookie policy and privacy policy before continuing to browse.</p>
</div></body></html>"#;

pub fn page(html: &str) -> FetchedPage {
    FetchedPage {
        html: html.to_string(),
        encoding: "UTF-8",
    }
}

/// Backend returning a canned result and counting how often it was called
pub struct StubBackend {
    id: BackendId,
    available: bool,
    response: Result<FetchedPage, FetchError>,
    calls: AtomicUsize,
}

impl StubBackend {
    pub fn new(id: BackendId, response: Result<FetchedPage, FetchError>) -> Arc<Self> {
        Arc::new(Self {
            id,
            available: true,
            response,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn html(id: BackendId, html: &str) -> Arc<Self> {
        Self::new(id, Ok(page(html)))
    }

    pub fn unavailable(id: BackendId) -> Arc<Self> {
        Arc::new(Self {
            id,
            available: false,
            response: Ok(page(JOB_HTML)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchBackend for StubBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn fetch(&self, _url: &Url) -> Result<FetchedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

/// Router over the given backends with default tables and thresholds
pub fn router_with(backends: &[Arc<StubBackend>]) -> ScrapeRouter {
    let mut registry = BackendRegistry::new();
    for backend in backends {
        registry.register(backend.clone());
    }
    ScrapeRouter::new(
        registry,
        &RoutingTables::default(),
        ValidationThresholds::default(),
    )
}

/// Serve `app` on an ephemeral local port
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
