// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scrape orchestration
//!
//! Classifies the target, walks the backend plan in order and returns the
//! first payload the validator accepts. Every attempt, successful or not, is
//! recorded so a failed request can explain itself.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use super::backend::{BackendId, FetchBackend};
use super::classifier::{normalize_url, DomainClassifier};
use super::config::{ScrapeConfig, ValidationThresholds};
use super::extractor::{extract, extract_title};
use super::registry::{BackendDescriptor, BackendRegistry};
use super::tables::{RoutingTables, TablesError};
use super::types::{
    Attempt, AttemptLog, AttemptOutcome, FailureKind, FetchError, ReasonCode, RoutingClass,
    ScrapeError, ScrapeOutcome,
};
use super::validator::ContentValidator;

/// Errors building a router at startup
#[derive(Debug, Error)]
pub enum RouterInitError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Tables(#[from] TablesError),

    #[error("failed to build backend: {0}")]
    Backend(#[from] FetchError),
}

/// Per-request routing overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Treat the host as JsRender regardless of the domain lists
    pub force_render: bool,
    /// Try exactly this backend and nothing else
    pub force_backend: Option<BackendId>,
}

/// Classifier and validator built from one routing tables snapshot
#[derive(Debug)]
struct RoutingRules {
    classifier: DomainClassifier,
    validator: ContentValidator,
}

impl RoutingRules {
    fn build(tables: &RoutingTables, thresholds: ValidationThresholds) -> Self {
        let tables = tables.clone().normalized();
        Self {
            classifier: DomainClassifier::new(&tables),
            validator: ContentValidator::new(&tables, thresholds),
        }
    }
}

/// Routes scrape requests across the configured backends
pub struct ScrapeRouter {
    registry: BackendRegistry,
    thresholds: ValidationThresholds,
    rules: RwLock<Arc<RoutingRules>>,
}

impl ScrapeRouter {
    pub fn new(
        registry: BackendRegistry,
        tables: &RoutingTables,
        thresholds: ValidationThresholds,
    ) -> Self {
        let rules = RoutingRules::build(tables, thresholds.clone());
        Self {
            registry,
            thresholds,
            rules: RwLock::new(Arc::new(rules)),
        }
    }

    /// Build the registry and load the routing tables described by `config`
    pub fn from_config(config: &ScrapeConfig) -> Result<Self, RouterInitError> {
        config.validate().map_err(RouterInitError::Config)?;

        let tables = RoutingTables::load_or_default(config.tables_path.as_deref())?;
        let registry = BackendRegistry::from_config(config)?;

        info!(
            "Scrape router ready, backends: [{}]",
            registry.available_backends().join(", ")
        );
        if !config.has_any_paid_backend() {
            warn!("No paid backends configured, only direct fetching is available");
        }

        Ok(Self::new(registry, &tables, config.thresholds.clone()))
    }

    /// Swap in new domain lists and phrase sets
    ///
    /// Requests already in flight finish against the snapshot they started with.
    pub async fn reload_tables(&self, tables: &RoutingTables) {
        let rules = Arc::new(RoutingRules::build(tables, self.thresholds.clone()));
        *self.rules.write().await = rules;
        info!(
            "Routing tables reloaded: {} js-render domains, {} unlocker domains",
            tables.js_render_domains.len(),
            tables.unlocker_domains.len()
        );
    }

    /// Re-read the routing tables file and swap it in
    pub async fn reload_tables_from(&self, path: &Path) -> Result<(), TablesError> {
        let tables = RoutingTables::load(path)?;
        self.reload_tables(&tables).await;
        Ok(())
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn describe_backends(&self) -> Vec<BackendDescriptor> {
        self.registry.describe()
    }

    /// Routing class a URL would get right now
    pub async fn classify(&self, raw_url: &str, force_render: bool) -> Result<RoutingClass, ScrapeError> {
        let url = normalize_url(raw_url)?;
        let rules = self.rules.read().await.clone();
        Ok(rules.classifier.classify(&url, force_render))
    }

    /// Scrape a URL
    ///
    /// # Arguments
    /// * `raw_url` - Target URL, scheme optional
    /// * `options` - Render and backend overrides
    ///
    /// # Returns
    /// Cleaned main-content text from the first backend whose payload was
    /// accepted, or an error carrying every attempt made
    pub async fn scrape(
        &self,
        raw_url: &str,
        options: ScrapeOptions,
    ) -> Result<ScrapeOutcome, ScrapeError> {
        let url = normalize_url(raw_url)?;
        let rules = self.rules.read().await.clone();
        let class = rules.classifier.classify(&url, options.force_render);
        let plan = self.plan(&url, class, options.force_backend)?;

        info!(
            "Scraping {} as {} via [{}]",
            url,
            class,
            plan.iter().map(|id| id.name()).collect::<Vec<_>>().join(", ")
        );

        let start = Instant::now();
        let mut attempts: AttemptLog = Vec::with_capacity(plan.len());

        for id in plan {
            let Some(backend) = self.registry.get(id) else {
                continue;
            };

            debug!("Trying backend {} for {}", id, url);
            let (outcome, text) = run_attempt(backend.as_ref(), &url, &rules.validator).await;
            attempts.push(Attempt {
                backend: id.name(),
                outcome,
            });

            if let Some(text) = text {
                info!(
                    "Scrape of {} accepted from {}: {} chars in {}ms",
                    url,
                    id,
                    text.chars().count(),
                    start.elapsed().as_millis()
                );
                return Ok(ScrapeOutcome {
                    text,
                    backend: id.name(),
                    url: url.to_string(),
                    classification: class,
                    attempts,
                });
            }

            if let Some(attempt) = attempts.last() {
                warn!(
                    "Backend {} rejected for {}: {} ({}), trying next",
                    id,
                    url,
                    attempt.reason_code(),
                    attempt.message()
                );
            }
        }

        let error = self.aggregate_failure(&url, class, attempts);
        warn!("Scrape of {} failed: {}", url, error);
        Err(error)
    }

    /// Ordered backends to try, or a configuration error before any I/O
    fn plan(
        &self,
        url: &Url,
        class: RoutingClass,
        force_backend: Option<BackendId>,
    ) -> Result<Vec<BackendId>, ScrapeError> {
        if let Some(id) = force_backend {
            if self.registry.is_configured(id) {
                return Ok(vec![id]);
            }
            let missing = id.required_settings().to_vec();
            return Err(ScrapeError::Configuration {
                classification: FailureKind::BackendNotConfigured,
                routing: class,
                message: format!(
                    "Requested backend {} is not configured (set {})",
                    id,
                    missing.join(", ")
                ),
                missing,
            });
        }

        let plan = self.registry.plan_for(class);
        if !plan.is_empty() {
            return Ok(plan);
        }

        let mut missing = self.registry.missing_settings(class);
        missing.dedup();
        let host = url.host_str().unwrap_or_default();
        let (classification, message) = if class == RoutingClass::JsRender {
            (
                FailureKind::JsRenderRequired,
                format!(
                    "{} requires JavaScript rendering but no render backend is configured (set {})",
                    host,
                    missing.join(", ")
                ),
            )
        } else {
            (
                FailureKind::BackendNotConfigured,
                format!(
                    "No backend configured for {} routing of {} (set {})",
                    class,
                    host,
                    missing.join(", ")
                ),
            )
        };

        Err(ScrapeError::Configuration {
            classification,
            routing: class,
            missing,
            message,
        })
    }

    fn aggregate_failure(&self, url: &Url, class: RoutingClass, attempts: AttemptLog) -> ScrapeError {
        let classification = self.failure_kind(class, &attempts);
        let reasons = attempts
            .iter()
            .map(|a| format!("{}: {}", a.backend, a.reason_code()))
            .collect::<Vec<_>>()
            .join(", ");
        let last_error = attempts.last().map(|a| a.message());

        ScrapeError::ScrapeFailure {
            classification,
            routing: class,
            message: format!("All backends failed for {} [{}]", url, reasons),
            last_error,
            attempts,
        }
    }

    /// Blocked outranks everything; thin content only when every attempt was thin
    fn failure_kind(&self, class: RoutingClass, attempts: &[Attempt]) -> FailureKind {
        if attempts
            .iter()
            .any(|a| a.rejection() == Some(ReasonCode::Blocked))
        {
            FailureKind::Blocked
        } else if class == RoutingClass::JsRender && !self.registry.has_render_backend() {
            FailureKind::JsRenderRequired
        } else if !attempts.is_empty()
            && attempts
                .iter()
                .all(|a| a.rejection().map(|r| r.is_thin()).unwrap_or(false))
        {
            FailureKind::ContentTooThin
        } else {
            FailureKind::AllBackendsFailed
        }
    }
}

/// Fetch, extract and validate with one backend
///
/// Returns the recorded outcome and, when accepted, the text. Panics inside
/// the backend or the parser are caught and recorded like any other failure.
async fn run_attempt(
    backend: &dyn FetchBackend,
    url: &Url,
    validator: &ContentValidator,
) -> (AttemptOutcome, Option<String>) {
    let pipeline = async {
        let page = backend.fetch(url).await?;
        let text = extract(&page.html);
        if let Some(title) = extract_title(&page.html) {
            debug!("{} returned \"{}\" ({})", backend.id(), title, page.encoding);
        }
        let verdict = validator.validate(&text);
        Ok::<_, FetchError>((verdict, text))
    };

    match AssertUnwindSafe(pipeline).catch_unwind().await {
        Ok(Ok((verdict, text))) => {
            let accepted = verdict.accepted.then_some(text);
            (AttemptOutcome::Verdict(verdict), accepted)
        }
        Ok(Err(e)) => (AttemptOutcome::Transport(e), None),
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            (
                AttemptOutcome::Transport(FetchError::Internal(detail)),
                None,
            )
        }
    }
}
