// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Routing tables: domain lists and phrase dictionaries
//!
//! Target sites change their defenses over time, so these lists are data
//! loaded from a TOML file rather than compiled-in constants. Any table
//! omitted from the file falls back to the built-in default.
//!
//! ```toml
//! js_render_domains = ["lever.co", "greenhouse.io"]
//! unlocker_domains = ["myworkdayjobs.com"]
//! blocked_phrases = ["verify you are human", "captcha"]
//! shell_phrases = ["sign in", "cookie policy"]
//! content_phrases = ["responsibilities", "qualifications"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_JS_RENDER_DOMAINS: &[&str] = &[
    "swooped.co",
    "lever.co",
    "greenhouse.io",
    "linkedin.com",
    "indeed.com",
    "glassdoor.com",
    "ziprecruiter.com",
    "monster.com",
    "angel.co",
    "wellfound.com",
    "ashbyhq.com",
    "workable.com",
];

const DEFAULT_UNLOCKER_DOMAINS: &[&str] = &[
    "myworkdayjobs.com",
    "icims.com",
    "taleo.net",
    "smartrecruiters.com",
    "successfactors.com",
    "jobvite.com",
];

const DEFAULT_BLOCKED_PHRASES: &[&str] = &[
    "captcha",
    "verify you are human",
    "verify you are a human",
    "are you a robot",
    "not a robot",
    "checking your browser",
    "just a moment",
    "access denied",
    "unusual traffic",
    "too many requests",
    "rate limit exceeded",
    "request blocked",
    "press and hold",
    "pardon our interruption",
    "enable javascript and cookies to continue",
    "cloudflare ray id",
    "attention required",
];

const DEFAULT_SHELL_PHRASES: &[&str] = &[
    "sign in",
    "log in",
    "create account",
    "cookie policy",
    "privacy policy",
    "terms of service",
    "terms of use",
    "all rights reserved",
    "skip to main content",
    "you need to enable javascript",
    "job alerts",
    "powered by",
];

const DEFAULT_CONTENT_PHRASES: &[&str] = &[
    "responsibilities",
    "qualifications",
    "requirements",
    "duties",
    "what you'll do",
    "what you will do",
    "about the role",
    "job description",
];

/// Errors loading routing tables
#[derive(Debug, Error)]
pub enum TablesError {
    #[error("Failed to read routing tables {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid routing tables {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Domain lists and phrase dictionaries used by the classifier and validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingTables {
    /// Hosts whose content only appears after scripts run
    pub js_render_domains: Vec<String>,
    /// Hosts that block plain requests
    pub unlocker_domains: Vec<String>,
    /// Bot-challenge, CAPTCHA and rate-limit phrases
    pub blocked_phrases: Vec<String>,
    /// Navigation/boilerplate chrome phrases
    pub shell_phrases: Vec<String>,
    /// Phrases that only appear in real job content
    pub content_phrases: Vec<String>,
}

impl Default for RoutingTables {
    fn default() -> Self {
        Self {
            js_render_domains: to_owned(DEFAULT_JS_RENDER_DOMAINS),
            unlocker_domains: to_owned(DEFAULT_UNLOCKER_DOMAINS),
            blocked_phrases: to_owned(DEFAULT_BLOCKED_PHRASES),
            shell_phrases: to_owned(DEFAULT_SHELL_PHRASES),
            content_phrases: to_owned(DEFAULT_CONTENT_PHRASES),
        }
    }
}

impl RoutingTables {
    /// Load tables from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TablesError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| TablesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| TablesError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if given, otherwise use the built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, TablesError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        let tables: Self = toml::from_str(raw)?;
        Ok(tables.normalized())
    }

    /// Lowercase and trim every entry, dropping blanks
    pub fn normalized(self) -> Self {
        Self {
            js_render_domains: normalize_list(self.js_render_domains),
            unlocker_domains: normalize_list(self.unlocker_domains),
            blocked_phrases: normalize_list(self.blocked_phrases),
            shell_phrases: normalize_list(self.shell_phrases),
            content_phrases: normalize_list(self.content_phrases),
        }
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(super) fn normalize_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim().trim_start_matches('.').to_lowercase();
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
