// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod http_server;
pub mod scrape;

pub use errors::{ApiError, AttemptSummary, ErrorResponse};
pub use http_server::{build_router, start_server, AppState};
pub use scrape::{
    legacy_scrape_handler, scrape_handler, status_handler, LegacyScrapeResponse, ScrapeApiRequest,
    ScrapeApiResponse, StatusResponse,
};
