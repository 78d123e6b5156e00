// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Domain classification
//!
//! Maps a target URL's host to the [`RoutingClass`] that decides which
//! backends are worth paying for.

use url::Url;

use super::tables::{normalize_list, RoutingTables};
use super::types::{RoutingClass, ScrapeError};

/// Add `https://` when the caller left the scheme off, then parse.
pub fn normalize_url(raw: &str) -> Result<Url, ScrapeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScrapeError::InvalidInput {
            reason: "url parameter required".to_string(),
        });
    }

    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else if lower.contains("://") {
        return Err(ScrapeError::InvalidInput {
            reason: format!("unsupported scheme in {}", trimmed),
        });
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme).map_err(|e| ScrapeError::InvalidInput {
        reason: format!("malformed url {}: {}", trimmed, e),
    })?;

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ScrapeError::InvalidInput {
            reason: format!("url has no host: {}", trimmed),
        }),
    }
}

/// Host → routing class lookup over the configured domain lists
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    js_render: Vec<String>,
    unlocker: Vec<String>,
}

impl DomainClassifier {
    pub fn new(tables: &RoutingTables) -> Self {
        Self {
            js_render: normalize_list(tables.js_render_domains.clone()),
            unlocker: normalize_list(tables.unlocker_domains.clone()),
        }
    }

    /// Classify a normalized URL. `force_render` always yields JsRender.
    pub fn classify(&self, url: &Url, force_render: bool) -> RoutingClass {
        if force_render {
            return RoutingClass::JsRender;
        }
        let host = url.host_str().unwrap_or_default().to_lowercase();
        self.classify_host(&host)
    }

    /// JsRender is checked before Unlocker: a render backend can serve
    /// server-rendered pages, the reverse is not true.
    pub fn classify_host(&self, host: &str) -> RoutingClass {
        let host = host.trim_end_matches('.').to_lowercase();
        if matches_any(&host, &self.js_render) {
            RoutingClass::JsRender
        } else if matches_any(&host, &self.unlocker) {
            RoutingClass::Unlocker
        } else {
            RoutingClass::Direct
        }
    }
}

impl Default for DomainClassifier {
    fn default() -> Self {
        Self::new(&RoutingTables::default())
    }
}

/// Label-aligned suffix match: `jobs.lever.co` matches `lever.co`,
/// `clever.co` does not.
fn matches_any(host: &str, domains: &[String]) -> bool {
    domains.iter().any(|domain| {
        host == domain
            || (host.len() > domain.len()
                && host.ends_with(domain.as_str())
                && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
    })
}
