// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for scrape routing

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Retrieval difficulty class of a target host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingClass {
    /// Server-rendered page, a plain GET is worth trying first
    Direct,
    /// Host defends against bots, needs an unlocker
    Unlocker,
    /// Content only exists after page scripts run
    JsRender,
}

impl RoutingClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Unlocker => "unlocker",
            Self::JsRender => "js_render",
        }
    }
}

impl fmt::Display for RoutingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the validator rejected a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCode {
    Empty,
    TooShort,
    Garbage,
    Blocked,
    ShellOnly,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::TooShort => "TooShort",
            Self::Garbage => "Garbage",
            Self::Blocked => "Blocked",
            Self::ShellOnly => "ShellOnly",
        }
    }

    /// Empty and TooShort both mean the page had too little text
    pub fn is_thin(&self) -> bool {
        matches!(self, Self::Empty | Self::TooShort)
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating one extracted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    pub accepted: bool,
    /// `None` exactly when `accepted` is true
    pub reason: Option<ReasonCode>,
    pub message: String,
}

impl ValidationVerdict {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            reason: None,
            message: "accepted".to_string(),
        }
    }

    pub fn reject(reason: ReasonCode, message: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: Some(reason),
            message: message.into(),
        }
    }
}

/// Transport-level failure of a single backend call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("backend not configured: missing {0}")]
    NotConfigured(String),

    /// The attempt aborted inside the backend or the extraction pipeline
    #[error("internal error: {0}")]
    Internal(String),
}

impl FetchError {
    /// Short code recorded in attempt logs
    pub fn code(&self) -> String {
        match self {
            Self::Network(_) => "NetworkError".to_string(),
            Self::Timeout { .. } => "Timeout".to_string(),
            Self::HttpStatus(status) => format!("HttpStatus({})", status),
            Self::NotConfigured(_) => "ConfigError".to_string(),
            Self::Internal(_) => "InternalError".to_string(),
        }
    }
}

/// What happened on one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Payload came back and the validator ruled on it
    Verdict(ValidationVerdict),
    /// The backend call itself failed
    Transport(FetchError),
}

/// One entry of the per-request attempt log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub backend: &'static str,
    pub outcome: AttemptOutcome,
}

impl Attempt {
    /// Reason code for the aggregate failure message
    pub fn reason_code(&self) -> String {
        match &self.outcome {
            AttemptOutcome::Verdict(v) => v
                .reason
                .map(|r| r.as_str().to_string())
                .unwrap_or_else(|| "Accepted".to_string()),
            AttemptOutcome::Transport(e) => e.code(),
        }
    }

    pub fn message(&self) -> String {
        match &self.outcome {
            AttemptOutcome::Verdict(v) => v.message.clone(),
            AttemptOutcome::Transport(e) => e.to_string(),
        }
    }

    pub fn rejection(&self) -> Option<ReasonCode> {
        match &self.outcome {
            AttemptOutcome::Verdict(v) => v.reason,
            AttemptOutcome::Transport(_) => None,
        }
    }
}

/// Ordered attempts made for one request
pub type AttemptLog = Vec<Attempt>;

/// Top-level failure classification returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    InvalidInput,
    AllBackendsFailed,
    ContentTooThin,
    JsRenderRequired,
    Blocked,
    BackendNotConfigured,
}

impl FailureKind {
    /// Stable wire code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput => "ERROR_INVALID_INPUT",
            Self::AllBackendsFailed => "ERROR_ALL_BACKENDS_FAILED",
            Self::ContentTooThin => "ERROR_MINIMAL_CONTENT",
            Self::JsRenderRequired => "ERROR_JAVASCRIPT_REQUIRED",
            Self::Blocked => "ERROR_BLOCKED",
            Self::BackendNotConfigured => "ERROR_BACKEND_NOT_CONFIGURED",
        }
    }
}

/// Successful scrape
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub text: String,
    pub backend: &'static str,
    pub url: String,
    pub classification: RoutingClass,
    pub attempts: AttemptLog,
}

/// Errors that can end a scrape request
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Missing or malformed URL
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Plan was empty before any network I/O
    #[error("{message}")]
    Configuration {
        classification: FailureKind,
        routing: RoutingClass,
        missing: Vec<&'static str>,
        message: String,
    },

    /// Every backend in the plan was attempted without an accepted verdict
    #[error("{message}")]
    ScrapeFailure {
        classification: FailureKind,
        routing: RoutingClass,
        attempts: AttemptLog,
        last_error: Option<String>,
        message: String,
    },
}

impl ScrapeError {
    pub fn classification(&self) -> FailureKind {
        match self {
            Self::InvalidInput { .. } => FailureKind::InvalidInput,
            Self::Configuration { classification, .. } => *classification,
            Self::ScrapeFailure { classification, .. } => *classification,
        }
    }

    pub fn attempts(&self) -> &[Attempt] {
        match self {
            Self::ScrapeFailure { attempts, .. } => attempts,
            _ => &[],
        }
    }
}
