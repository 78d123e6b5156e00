// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Direct fetch backend
//!
//! Plain GET with a realistic, randomly chosen browser identity. The cheapest
//! backend and the first one tried for ordinary hosts.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::backend::{BackendId, FetchBackend, FetchedPage};
use super::transport::{map_request_error, read_page};
use super::types::FetchError;

pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANG: &str = "en-US,en;q=0.9";

/// Headers of a randomly chosen desktop browser
pub fn browser_headers() -> HeaderMap {
    let agent = USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0]);

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(agent));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANG));
    headers
}

/// Direct GET backend
pub struct DirectFetcher {
    client: Client,
    timeout_secs: u64,
}

impl DirectFetcher {
    /// Create a new direct fetcher
    ///
    /// # Arguments
    /// * `timeout_secs` - Whole-request timeout
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }
}

#[async_trait]
impl FetchBackend for DirectFetcher {
    fn id(&self) -> BackendId {
        BackendId::Direct
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        debug!("Direct GET {}", url);
        let headers = browser_headers();
        let response = self
            .client
            .get(url.as_str())
            .headers(headers)
            .send()
            .await
            .map_err(|e| map_request_error(e, self.timeout_secs))?;

        read_page(response, self.timeout_secs).await
    }
}
