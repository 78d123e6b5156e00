// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scrape::{Attempt, FailureKind, ScrapeError};

/// One backend attempt as reported to API callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttemptSummary {
    pub backend: String,
    pub reason: String,
    pub message: String,
}

impl From<&Attempt> for AttemptSummary {
    fn from(attempt: &Attempt) -> Self {
        Self {
            backend: attempt.backend.to_string(),
            reason: attempt.reason_code(),
            message: attempt.message(),
        }
    }
}

/// JSON body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    /// Stable error code, e.g. `ERROR_JAVASCRIPT_REQUIRED`
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attempts: Vec<AttemptSummary>,
    /// Settings that would make the request routable
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_settings: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest {
        message: String,
        url: Option<String>,
    },
    ScrapeFailed {
        kind: FailureKind,
        message: String,
        url: String,
        attempts: Vec<AttemptSummary>,
        missing_settings: Vec<String>,
    },
    InternalError(String),
}

impl ApiError {
    pub fn invalid(message: impl Into<String>, url: Option<String>) -> Self {
        ApiError::InvalidRequest {
            message: message.into(),
            url,
        }
    }

    /// Map a router error for the URL the caller sent
    pub fn from_scrape(err: ScrapeError, url: &str) -> Self {
        match err {
            ScrapeError::InvalidInput { reason } => Self::invalid(reason, Some(url.to_string())),
            ScrapeError::Configuration {
                classification,
                missing,
                message,
                ..
            } => ApiError::ScrapeFailed {
                kind: classification,
                message,
                url: url.to_string(),
                attempts: Vec::new(),
                missing_settings: missing.into_iter().map(String::from).collect(),
            },
            ScrapeError::ScrapeFailure {
                classification,
                attempts,
                message,
                ..
            } => ApiError::ScrapeFailed {
                kind: classification,
                message,
                url: url.to_string(),
                attempts: attempts.iter().map(AttemptSummary::from).collect(),
                missing_settings: Vec::new(),
            },
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        match self {
            ApiError::InvalidRequest { message, url } => ErrorResponse {
                success: false,
                error: FailureKind::InvalidInput.code().to_string(),
                message: message.clone(),
                url: url.clone(),
                attempts: Vec::new(),
                missing_settings: Vec::new(),
            },
            ApiError::ScrapeFailed {
                kind,
                message,
                url,
                attempts,
                missing_settings,
            } => ErrorResponse {
                success: false,
                error: kind.code().to_string(),
                message: message.clone(),
                url: Some(url.clone()),
                attempts: attempts.clone(),
                missing_settings: missing_settings.clone(),
            },
            ApiError::InternalError(msg) => ErrorResponse {
                success: false,
                error: "ERROR_UNKNOWN".to_string(),
                message: msg.clone(),
                url: None,
                attempts: Vec::new(),
                missing_settings: Vec::new(),
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest { .. } => 400,
            ApiError::ScrapeFailed { .. } => 422,
            ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest { message, .. } => write!(f, "Invalid request: {}", message),
            ApiError::ScrapeFailed { kind, message, .. } => {
                write!(f, "{}: {}", kind.code(), message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!("Scrape task failed: {}", err);
        ApiError::InternalError(if err.is_panic() {
            "scrape task panicked".to_string()
        } else {
            "scrape task cancelled".to_string()
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
