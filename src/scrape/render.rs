// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Headless rendering service backend
//!
//! Asks a hosted headless browser for the page's HTML after its scripts have
//! run, waiting a bounded time for the network to go idle.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::backend::{BackendId, FetchBackend, FetchedPage};
use super::config::RenderServiceCredentials;
use super::transport::{map_request_error, read_page};
use super::types::FetchError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest<'a> {
    url: &'a str,
    goto_options: GotoOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: &'static str,
    timeout: u64,
}

/// Rendering service backend
pub struct RenderServiceFetcher {
    creds: RenderServiceCredentials,
    client: Client,
    timeout_secs: u64,
    wait_ms: u64,
}

impl RenderServiceFetcher {
    /// Create a new render service backend
    ///
    /// # Arguments
    /// * `creds` - Service token and endpoint
    /// * `timeout_secs` - Whole-request timeout
    /// * `wait_ms` - Upper bound the service waits for the page to settle
    pub fn new(
        creds: RenderServiceCredentials,
        timeout_secs: u64,
        wait_ms: u64,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            creds,
            client,
            timeout_secs,
            wait_ms,
        })
    }
}

#[async_trait]
impl FetchBackend for RenderServiceFetcher {
    fn id(&self) -> BackendId {
        BackendId::HeadlessBrowserService
    }

    fn is_available(&self) -> bool {
        !self.creds.token.is_empty()
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        if !self.is_available() {
            return Err(FetchError::NotConfigured("BROWSERLESS_TOKEN".to_string()));
        }

        debug!("Render service request for {}", url);
        let body = RenderRequest {
            url: url.as_str(),
            goto_options: GotoOptions {
                wait_until: "networkidle2",
                timeout: self.wait_ms,
            },
        };

        let response = self
            .client
            .post(&self.creds.endpoint)
            .query(&[("token", self.creds.token.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| map_request_error(e, self.timeout_secs))?;

        read_page(response, self.timeout_secs).await
    }
}
