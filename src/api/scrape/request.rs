// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scrape API request types

use serde::{Deserialize, Serialize};

use crate::scrape::{BackendId, ScrapeOptions};

/// Longest URL accepted
const MAX_URL_LEN: usize = 2048;

/// Request body for POST /v1/scrape
///
/// `website` and `force_js` are accepted as aliases of `url` and
/// `forceRender` for older clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeApiRequest {
    /// Target URL, scheme optional
    #[serde(default, alias = "website")]
    pub url: Option<String>,

    /// Route through a rendering backend regardless of host
    #[serde(default, alias = "force_js")]
    pub force_render: bool,

    /// Use exactly this backend (wire name, e.g. `web_unlocker_api`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl ScrapeApiRequest {
    /// Trimmed target URL, empty when absent
    pub fn target(&self) -> &str {
        self.url.as_deref().map(str::trim).unwrap_or_default()
    }

    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        let target = self.target();
        if target.is_empty() {
            return Err("url parameter required".to_string());
        }
        if target.len() > MAX_URL_LEN {
            return Err(format!("url too long (max {} characters)", MAX_URL_LEN));
        }
        self.forced_backend().map(|_| ())
    }

    /// Routing options carried by the request
    pub fn options(&self) -> Result<ScrapeOptions, String> {
        Ok(ScrapeOptions {
            force_render: self.force_render,
            force_backend: self.forced_backend()?,
        })
    }

    fn forced_backend(&self) -> Result<Option<BackendId>, String> {
        match self.backend.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => BackendId::from_name(name).map(Some).ok_or_else(|| {
                let known = BackendId::ALL.iter().map(|id| id.name()).collect::<Vec<_>>();
                format!("unknown backend '{}', expected one of: {}", name, known.join(", "))
            }),
        }
    }
}
