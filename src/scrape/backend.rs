// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fetch backend trait definition

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use url::Url;

use super::types::FetchError;

/// Every retrieval method the router knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendId {
    Direct,
    WebUnlockerApi,
    WebUnlockerProxy,
    ScrapingBrowserProxy,
    HeadlessBrowserService,
}

/// How a backend reaches the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransportKind {
    HttpDirect,
    HttpProxy,
    HttpApi,
}

impl BackendId {
    pub const ALL: [BackendId; 5] = [
        BackendId::Direct,
        BackendId::WebUnlockerApi,
        BackendId::WebUnlockerProxy,
        BackendId::ScrapingBrowserProxy,
        BackendId::HeadlessBrowserService,
    ];

    /// Name used in logs, attempt logs and API responses
    pub fn name(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::WebUnlockerApi => "web_unlocker_api",
            Self::WebUnlockerProxy => "web_unlocker_proxy",
            Self::ScrapingBrowserProxy => "scraping_browser",
            Self::HeadlessBrowserService => "headless_browser",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn transport(&self) -> TransportKind {
        match self {
            Self::Direct => TransportKind::HttpDirect,
            Self::WebUnlockerProxy | Self::ScrapingBrowserProxy => TransportKind::HttpProxy,
            Self::WebUnlockerApi | Self::HeadlessBrowserService => TransportKind::HttpApi,
        }
    }

    /// Whether the backend executes page scripts before returning HTML
    pub fn renders_js(&self) -> bool {
        matches!(self, Self::ScrapingBrowserProxy | Self::HeadlessBrowserService)
    }

    /// Settings that must be present for this backend to be configured
    pub fn required_settings(&self) -> &'static [&'static str] {
        match self {
            Self::Direct => &["DIRECT_FETCH_ENABLED"],
            Self::WebUnlockerApi => &["BRIGHTDATA_API_KEY", "BRIGHTDATA_UNLOCKER_ZONE"],
            Self::WebUnlockerProxy => &[
                "BRIGHTDATA_UNLOCKER_PROXY_USERNAME",
                "BRIGHTDATA_UNLOCKER_PROXY_PASSWORD",
            ],
            Self::ScrapingBrowserProxy => &[
                "BRIGHTDATA_BROWSER_PROXY_USERNAME",
                "BRIGHTDATA_BROWSER_PROXY_PASSWORD",
            ],
            Self::HeadlessBrowserService => &["BROWSERLESS_TOKEN"],
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw page returned by a backend
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    /// Encoding the body was decoded with
    pub encoding: &'static str,
}

/// Trait for implementing fetch backends
///
/// Backends are opaque vendors behind one contract: given a URL, return the
/// page HTML or a transport error. A backend without credentials reports
/// itself unavailable and is filtered out of every plan.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FetchBackend: Send + Sync {
    /// Which backend this is
    fn id(&self) -> BackendId;

    /// Check if the backend has what it needs to run (credentials, etc.)
    fn is_available(&self) -> bool;

    /// Fetch the page. Each implementation enforces its own timeout.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}
