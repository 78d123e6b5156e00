// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for scrape routing
//!
//! Read once at process start. Every credential is optional: a missing
//! credential only removes its backend from the plans, it never fails
//! startup.

use std::env;
use std::path::PathBuf;

const DEFAULT_UNLOCKER_API_URL: &str = "https://api.brightdata.com/request";
const DEFAULT_PROXY_HOST: &str = "brd.superproxy.io";
const DEFAULT_PROXY_PORT: u16 = 33335;
const DEFAULT_RENDER_URL: &str = "https://production-sfo.browserless.io/content";

/// Top-level scrape configuration
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Whether plain direct GETs are allowed
    pub direct_enabled: bool,
    /// Backend credentials
    pub credentials: BackendCredentials,
    /// Per-backend request timeouts
    pub timeouts: BackendTimeouts,
    /// Validator thresholds
    pub thresholds: ValidationThresholds,
    /// Optional TOML file with domain lists and phrase sets
    pub tables_path: Option<PathBuf>,
}

/// Unlocker API credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockerApiCredentials {
    pub api_key: String,
    pub zone: String,
    pub endpoint: String,
}

/// Authenticated HTTP proxy credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Unlocker proxies re-sign TLS with their own CA
    pub accept_invalid_certs: bool,
}

impl ProxyCredentials {
    pub fn proxy_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Headless rendering service credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderServiceCredentials {
    pub token: String,
    pub endpoint: String,
}

/// Credentials for every paid backend
#[derive(Debug, Clone, Default)]
pub struct BackendCredentials {
    pub unlocker_api: Option<UnlockerApiCredentials>,
    pub unlocker_proxy: Option<ProxyCredentials>,
    pub browser_proxy: Option<ProxyCredentials>,
    pub render_service: Option<RenderServiceCredentials>,
}

/// Request timeouts in seconds, scaled to backend cost
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub direct_secs: u64,
    pub unlocker_api_secs: u64,
    pub unlocker_proxy_secs: u64,
    pub browser_proxy_secs: u64,
    pub render_secs: u64,
    /// How long the render service waits for the page to settle
    pub render_wait_ms: u64,
}

impl Default for BackendTimeouts {
    fn default() -> Self {
        Self {
            direct_secs: 15,
            unlocker_api_secs: 60,
            unlocker_proxy_secs: 60,
            browser_proxy_secs: 90,
            render_secs: 120,
            render_wait_ms: 30_000,
        }
    }
}

/// Content validator thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationThresholds {
    /// Below this many characters the text is treated as garbage
    pub garbage_min_chars: usize,
    /// Final acceptance floor
    pub min_chars: usize,
    /// Maximum share of control characters
    pub max_control_ratio: f64,
    /// Minimum number of alphabetic words of 3+ letters
    pub min_words: usize,
    /// Distinct block phrases that reject regardless of length
    pub blocked_min_phrases: usize,
    /// Texts shorter than this are rejected on a single block phrase
    pub blocked_short_text_chars: usize,
    /// Distinct shell phrases needed for a ShellOnly rejection
    pub shell_min_phrases: usize,
    /// Content phrases that rescue a page from ShellOnly
    pub content_min_phrases: usize,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            garbage_min_chars: 50,
            min_chars: 100,
            max_control_ratio: 0.05,
            min_words: 10,
            blocked_min_phrases: 2,
            blocked_short_text_chars: 2000,
            shell_min_phrases: 2,
            content_min_phrases: 1,
        }
    }
}

impl ValidationThresholds {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            garbage_min_chars: env_parse("VALIDATOR_GARBAGE_MIN_CHARS").unwrap_or(d.garbage_min_chars),
            min_chars: env_parse("VALIDATOR_MIN_CHARS").unwrap_or(d.min_chars),
            max_control_ratio: env_parse("VALIDATOR_MAX_CONTROL_RATIO").unwrap_or(d.max_control_ratio),
            min_words: env_parse("VALIDATOR_MIN_WORDS").unwrap_or(d.min_words),
            blocked_min_phrases: env_parse("VALIDATOR_BLOCKED_MIN_PHRASES")
                .unwrap_or(d.blocked_min_phrases),
            blocked_short_text_chars: env_parse("VALIDATOR_BLOCKED_SHORT_TEXT_CHARS")
                .unwrap_or(d.blocked_short_text_chars),
            shell_min_phrases: env_parse("VALIDATOR_SHELL_MIN_PHRASES").unwrap_or(d.shell_min_phrases),
            content_min_phrases: env_parse("VALIDATOR_CONTENT_MIN_PHRASES")
                .unwrap_or(d.content_min_phrases),
        }
    }
}

impl ScrapeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let d = BackendTimeouts::default();
        Self {
            direct_enabled: env::var("DIRECT_FETCH_ENABLED")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(true),
            credentials: BackendCredentials {
                unlocker_api: unlocker_api_from_env(),
                unlocker_proxy: proxy_from_env("BRIGHTDATA_UNLOCKER_PROXY"),
                browser_proxy: proxy_from_env("BRIGHTDATA_BROWSER_PROXY"),
                render_service: env_nonempty("BROWSERLESS_TOKEN").map(|token| {
                    RenderServiceCredentials {
                        token,
                        endpoint: env_nonempty("BROWSERLESS_URL")
                            .unwrap_or_else(|| DEFAULT_RENDER_URL.to_string()),
                    }
                }),
            },
            timeouts: BackendTimeouts {
                direct_secs: env_parse("DIRECT_TIMEOUT_SECS").unwrap_or(d.direct_secs),
                unlocker_api_secs: env_parse("UNLOCKER_API_TIMEOUT_SECS").unwrap_or(d.unlocker_api_secs),
                unlocker_proxy_secs: env_parse("UNLOCKER_PROXY_TIMEOUT_SECS")
                    .unwrap_or(d.unlocker_proxy_secs),
                browser_proxy_secs: env_parse("BROWSER_PROXY_TIMEOUT_SECS")
                    .unwrap_or(d.browser_proxy_secs),
                render_secs: env_parse("RENDER_TIMEOUT_SECS").unwrap_or(d.render_secs),
                render_wait_ms: env_parse("RENDER_WAIT_MS").unwrap_or(d.render_wait_ms),
            },
            thresholds: ValidationThresholds::from_env(),
            tables_path: env_nonempty("ROUTING_TABLES_PATH").map(PathBuf::from),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let t = &self.timeouts;
        if [
            t.direct_secs,
            t.unlocker_api_secs,
            t.unlocker_proxy_secs,
            t.browser_proxy_secs,
            t.render_secs,
        ]
        .contains(&0)
        {
            return Err("Backend timeouts must be greater than 0".to_string());
        }
        if t.render_wait_ms / 1000 >= t.render_secs {
            return Err("render_wait_ms must be shorter than the render timeout".to_string());
        }

        let v = &self.thresholds;
        if v.garbage_min_chars > v.min_chars {
            return Err("garbage_min_chars cannot exceed min_chars".to_string());
        }
        if !(0.0..=1.0).contains(&v.max_control_ratio) {
            return Err("max_control_ratio must be between 0 and 1".to_string());
        }
        if v.blocked_min_phrases == 0 || v.shell_min_phrases == 0 {
            return Err("Phrase thresholds must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Check if any paid backend is configured
    pub fn has_any_paid_backend(&self) -> bool {
        let c = &self.credentials;
        c.unlocker_api.is_some()
            || c.unlocker_proxy.is_some()
            || c.browser_proxy.is_some()
            || c.render_service.is_some()
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            direct_enabled: true,
            credentials: BackendCredentials::default(),
            timeouts: BackendTimeouts::default(),
            thresholds: ValidationThresholds::default(),
            tables_path: None,
        }
    }
}

fn unlocker_api_from_env() -> Option<UnlockerApiCredentials> {
    let api_key = env_nonempty("BRIGHTDATA_API_KEY")?;
    let zone = env_nonempty("BRIGHTDATA_UNLOCKER_ZONE")?;
    Some(UnlockerApiCredentials {
        api_key,
        zone,
        endpoint: env_nonempty("BRIGHTDATA_API_URL")
            .unwrap_or_else(|| DEFAULT_UNLOCKER_API_URL.to_string()),
    })
}

fn proxy_from_env(prefix: &str) -> Option<ProxyCredentials> {
    let username = env_nonempty(&format!("{}_USERNAME", prefix))?;
    let password = env_nonempty(&format!("{}_PASSWORD", prefix))?;
    Some(ProxyCredentials {
        username,
        password,
        host: env_nonempty(&format!("{}_HOST", prefix))
            .unwrap_or_else(|| DEFAULT_PROXY_HOST.to_string()),
        port: env_parse(&format!("{}_PORT", prefix)).unwrap_or(DEFAULT_PROXY_PORT),
        accept_invalid_certs: env::var(format!("{}_VERIFY_TLS", prefix))
            .map(|v| v.to_lowercase() == "false")
            .unwrap_or(true),
    })
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
