// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scrape API endpoint handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{debug, info, warn};

use super::request::ScrapeApiRequest;
use super::response::{LegacyScrapeResponse, ScrapeApiResponse, StatusResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

/// POST /v1/scrape - Scrape a page's main content
///
/// # Request
/// - `url` (or `website`): Target URL, scheme optional
/// - `forceRender` (or `force_js`): Treat the host as needing JS rendering
/// - `backend`: Optional single backend to use
///
/// # Response
/// - `text`, `textLength`: Cleaned main-content text
/// - `url`: Normalized URL
/// - `backend`: Backend whose payload was accepted
/// - `classification`: Routing class of the host
///
/// # Errors
/// - 400 Bad Request: Missing or malformed input
/// - 422 Unprocessable Entity: No backend produced acceptable content
/// - 500 Internal Server Error: The scrape task panicked
pub async fn scrape_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeApiRequest>, JsonRejection>,
) -> Result<Json<ScrapeApiResponse>, ApiError> {
    run_scrape(state, payload).await.map(Json)
}

/// POST / - Same as /v1/scrape, with `text_length` and `method` added
pub async fn legacy_scrape_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeApiRequest>, JsonRejection>,
) -> Result<Json<LegacyScrapeResponse>, ApiError> {
    run_scrape(state, payload)
        .await
        .map(|response| Json(LegacyScrapeResponse::from(response)))
}

async fn run_scrape(
    state: AppState,
    payload: Result<Json<ScrapeApiRequest>, JsonRejection>,
) -> Result<ScrapeApiResponse, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::invalid(e.body_text(), None))?;
    debug!("Scrape request: {:?}", request.url);

    let target = request.target().to_string();
    if let Err(e) = request.validate() {
        warn!("Scrape validation failed: {}", e);
        return Err(ApiError::invalid(e, Some(target)));
    }
    let options = request
        .options()
        .map_err(|e| ApiError::invalid(e, Some(target.clone())))?;

    let router = state.router.clone();
    let url = target.clone();
    let outcome = tokio::spawn(async move { router.scrape(&url, options).await })
        .await?
        .map_err(|e| ApiError::from_scrape(e, &target))?;

    info!(
        "Scrape complete: {} chars from {} via {}",
        outcome.text.chars().count(),
        outcome.url,
        outcome.backend
    );

    Ok(ScrapeApiResponse::from(outcome))
}

/// GET /health - Service status and backend configuration
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse::running(state.router.describe_backends()))
}
