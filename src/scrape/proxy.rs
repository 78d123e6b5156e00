// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Authenticated-proxy fetch backends
//!
//! Both the web unlocker proxy and the scraping browser are reached the same
//! way: an ordinary GET tunneled through a vendor proxy with basic auth. The
//! vendor decides how much work (fingerprinting, CAPTCHA solving, script
//! execution) happens behind it.

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::backend::{BackendId, FetchBackend, FetchedPage};
use super::config::ProxyCredentials;
use super::direct::browser_headers;
use super::transport::{map_request_error, read_page};
use super::types::FetchError;

/// GET through an authenticated HTTP proxy
pub struct ProxyFetcher {
    id: BackendId,
    client: Client,
    proxy_host: String,
    timeout_secs: u64,
}

impl ProxyFetcher {
    /// Create a proxy-backed fetcher
    ///
    /// # Arguments
    /// * `id` - Which proxy backend this instance serves
    /// * `creds` - Proxy host, port and basic auth credentials
    /// * `timeout_secs` - Whole-request timeout
    pub fn new(id: BackendId, creds: &ProxyCredentials, timeout_secs: u64) -> Result<Self, FetchError> {
        let proxy = Proxy::all(creds.proxy_url())
            .map_err(|e| FetchError::NotConfigured(format!("invalid proxy address: {}", e)))?
            .basic_auth(&creds.username, &creds.password);

        let client = Client::builder()
            .proxy(proxy)
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(creds.accept_invalid_certs)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            id,
            client,
            proxy_host: creds.host.clone(),
            timeout_secs,
        })
    }
}

#[async_trait]
impl FetchBackend for ProxyFetcher {
    fn id(&self) -> BackendId {
        self.id
    }

    fn is_available(&self) -> bool {
        !self.proxy_host.is_empty()
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        debug!("{} GET {} via {}", self.id, url, self.proxy_host);
        let response = self
            .client
            .get(url.as_str())
            .headers(browser_headers())
            .send()
            .await
            .map_err(|e| map_request_error(e, self.timeout_secs))?;

        read_page(response, self.timeout_secs).await
    }
}
