// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Backend registry and attempt plans
//!
//! Each routing class has a fixed, ordered plan. The registry filters that
//! plan down to the backends that are actually configured.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::backend::{BackendId, FetchBackend, TransportKind};
use super::config::ScrapeConfig;
use super::direct::DirectFetcher;
use super::proxy::ProxyFetcher;
use super::render::RenderServiceFetcher;
use super::types::{FetchError, RoutingClass};
use super::unlocker::UnlockerApiFetcher;

/// Cheaper render service first
const JS_RENDER_PLAN: &[BackendId] = &[
    BackendId::HeadlessBrowserService,
    BackendId::ScrapingBrowserProxy,
];

/// Most anti-bot-capable first, browser rendering as last resort
const UNLOCKER_PLAN: &[BackendId] = &[
    BackendId::ScrapingBrowserProxy,
    BackendId::WebUnlockerApi,
    BackendId::WebUnlockerProxy,
    BackendId::HeadlessBrowserService,
];

/// Cheapest first, escalating capability
const DIRECT_PLAN: &[BackendId] = &[
    BackendId::Direct,
    BackendId::WebUnlockerApi,
    BackendId::WebUnlockerProxy,
    BackendId::ScrapingBrowserProxy,
    BackendId::HeadlessBrowserService,
];

/// Unfiltered plan for a routing class
pub fn plan_table(class: RoutingClass) -> &'static [BackendId] {
    match class {
        RoutingClass::JsRender => JS_RENDER_PLAN,
        RoutingClass::Unlocker => UNLOCKER_PLAN,
        RoutingClass::Direct => DIRECT_PLAN,
    }
}

/// Public description of one backend (never includes secret values)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendDescriptor {
    pub name: &'static str,
    pub transport: TransportKind,
    /// Settings that make up this backend's credential bundle
    pub credentials: Vec<&'static str>,
    pub configured: bool,
}

/// Registered backends, at most one per [`BackendId`]
#[derive(Default)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn FetchBackend>>,
}

impl BackendRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every backend whose credentials are present in `config`
    pub fn from_config(config: &ScrapeConfig) -> Result<Self, FetchError> {
        let mut registry = Self::new();
        let timeouts = &config.timeouts;
        let creds = &config.credentials;

        if config.direct_enabled {
            registry.register(Arc::new(DirectFetcher::new(timeouts.direct_secs)?));
            debug!("Direct backend enabled");
        }

        if let Some(api) = &creds.unlocker_api {
            registry.register(Arc::new(UnlockerApiFetcher::new(
                api.clone(),
                timeouts.unlocker_api_secs,
            )?));
            debug!("Web unlocker API backend enabled");
        }

        if let Some(proxy) = &creds.unlocker_proxy {
            registry.register(Arc::new(ProxyFetcher::new(
                BackendId::WebUnlockerProxy,
                proxy,
                timeouts.unlocker_proxy_secs,
            )?));
            debug!("Web unlocker proxy backend enabled");
        }

        if let Some(proxy) = &creds.browser_proxy {
            registry.register(Arc::new(ProxyFetcher::new(
                BackendId::ScrapingBrowserProxy,
                proxy,
                timeouts.browser_proxy_secs,
            )?));
            debug!("Scraping browser proxy backend enabled");
        }

        if let Some(render) = &creds.render_service {
            registry.register(Arc::new(RenderServiceFetcher::new(
                render.clone(),
                timeouts.render_secs,
                timeouts.render_wait_ms,
            )?));
            debug!("Headless render backend enabled");
        }

        Ok(registry)
    }

    /// Add a backend, replacing any earlier one with the same id
    pub fn register(&mut self, backend: Arc<dyn FetchBackend>) {
        let id = backend.id();
        self.backends.retain(|b| b.id() != id);
        self.backends.push(backend);
    }

    pub fn get(&self, id: BackendId) -> Option<Arc<dyn FetchBackend>> {
        self.backends.iter().find(|b| b.id() == id).cloned()
    }

    pub fn is_configured(&self, id: BackendId) -> bool {
        self.get(id).map(|b| b.is_available()).unwrap_or(false)
    }

    /// Ordered plan for `class`, filtered to configured backends
    pub fn plan_for(&self, class: RoutingClass) -> Vec<BackendId> {
        plan_table(class)
            .iter()
            .copied()
            .filter(|id| self.is_configured(*id))
            .collect()
    }

    /// Whether any script-executing backend is configured
    pub fn has_render_backend(&self) -> bool {
        BackendId::ALL
            .iter()
            .any(|id| id.renders_js() && self.is_configured(*id))
    }

    /// Settings that would enable the unconfigured backends of `class`'s plan
    pub fn missing_settings(&self, class: RoutingClass) -> Vec<&'static str> {
        plan_table(class)
            .iter()
            .filter(|id| !self.is_configured(**id))
            .flat_map(|id| id.required_settings().iter().copied())
            .collect()
    }

    /// Descriptors for every known backend, in canonical order
    pub fn describe(&self) -> Vec<BackendDescriptor> {
        BackendId::ALL
            .iter()
            .map(|id| BackendDescriptor {
                name: id.name(),
                transport: id.transport(),
                credentials: id.required_settings().to_vec(),
                configured: self.is_configured(*id),
            })
            .collect()
    }

    /// Names of configured backends
    pub fn available_backends(&self) -> Vec<&'static str> {
        BackendId::ALL
            .iter()
            .filter(|id| self.is_configured(**id))
            .map(|id| id.name())
            .collect()
    }
}
