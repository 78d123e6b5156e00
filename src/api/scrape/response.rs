// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scrape API response types

use serde::{Deserialize, Serialize};

use crate::scrape::{BackendDescriptor, RoutingClass, ScrapeOutcome};

/// Response body for a successful POST /v1/scrape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeApiResponse {
    pub success: bool,

    /// Cleaned main-content text
    pub text: String,

    /// Length of `text` in characters
    pub text_length: usize,

    /// Normalized URL that was scraped
    pub url: String,

    /// Backend whose payload was accepted
    pub backend: String,

    /// Routing class the host was given
    pub classification: RoutingClass,

    /// Backends tried, the accepted one included
    pub attempt_count: usize,
}

impl From<ScrapeOutcome> for ScrapeApiResponse {
    fn from(outcome: ScrapeOutcome) -> Self {
        Self {
            success: true,
            text_length: outcome.text.chars().count(),
            attempt_count: outcome.attempts.len(),
            text: outcome.text,
            url: outcome.url,
            backend: outcome.backend.to_string(),
            classification: outcome.classification,
        }
    }
}

/// Response body for POST /, carrying the snake_case fields older clients read
#[derive(Debug, Clone, Serialize)]
pub struct LegacyScrapeResponse {
    #[serde(flatten)]
    pub response: ScrapeApiResponse,
    pub text_length: usize,
    /// Accepted backend under its older name
    pub method: String,
}

impl From<ScrapeApiResponse> for LegacyScrapeResponse {
    fn from(response: ScrapeApiResponse) -> Self {
        Self {
            text_length: response.text_length,
            method: response.backend.clone(),
            response,
        }
    }
}

/// Response body for GET / and GET /health
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub build: serde_json::Value,
    pub backends: Vec<BackendDescriptor>,
}

impl StatusResponse {
    pub fn running(backends: Vec<BackendDescriptor>) -> Self {
        Self {
            status: "running",
            version: crate::version::VERSION_NUMBER,
            build: crate::version::get_version_info(),
            backends,
        }
    }
}
