// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web unlocker API backend
//!
//! POSTs the target URL to the vendor's scraping API and gets the raw,
//! server-rendered HTML back. No page scripts are executed.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::backend::{BackendId, FetchBackend, FetchedPage};
use super::config::UnlockerApiCredentials;
use super::transport::{map_request_error, read_page};
use super::types::FetchError;

/// Request body for the unlocker API
#[derive(Debug, Serialize)]
struct UnlockerRequest<'a> {
    zone: &'a str,
    url: &'a str,
    format: &'static str,
}

/// Web unlocker API backend
pub struct UnlockerApiFetcher {
    creds: UnlockerApiCredentials,
    client: Client,
    timeout_secs: u64,
}

impl UnlockerApiFetcher {
    /// Create a new unlocker API backend
    ///
    /// # Arguments
    /// * `creds` - API key, zone and endpoint
    /// * `timeout_secs` - Whole-request timeout
    pub fn new(creds: UnlockerApiCredentials, timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            creds,
            client,
            timeout_secs,
        })
    }
}

#[async_trait]
impl FetchBackend for UnlockerApiFetcher {
    fn id(&self) -> BackendId {
        BackendId::WebUnlockerApi
    }

    fn is_available(&self) -> bool {
        !self.creds.api_key.is_empty() && !self.creds.zone.is_empty()
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        if !self.is_available() {
            return Err(FetchError::NotConfigured(
                BackendId::WebUnlockerApi.required_settings().join(", "),
            ));
        }

        debug!("Unlocker API request for {}", url);
        let body = UnlockerRequest {
            zone: &self.creds.zone,
            url: url.as_str(),
            format: "raw",
        };

        let response = self
            .client
            .post(&self.creds.endpoint)
            .bearer_auth(&self.creds.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_request_error(e, self.timeout_secs))?;

        read_page(response, self.timeout_secs).await
    }
}
