// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::scrape::{legacy_scrape_handler, scrape_handler, status_handler};
use crate::scrape::ScrapeRouter;

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ScrapeRouter>,
}

impl AppState {
    pub fn new(router: Arc<ScrapeRouter>) -> Self {
        Self { router }
    }
}

/// Build the HTTP routes over a shared scrape router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Status
        .route("/", get(status_handler).post(legacy_scrape_handler))
        .route("/health", get(status_handler))
        // Scrape endpoint
        .route("/v1/scrape", post(scrape_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, router: Arc<ScrapeRouter>) -> Result<()> {
    let app = build_router(AppState::new(router));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
