// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Scrape API endpoint
//!
//! Provides the `/v1/scrape` HTTP endpoint and the service status endpoint.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{legacy_scrape_handler, scrape_handler, status_handler};
pub use request::ScrapeApiRequest;
pub use response::{LegacyScrapeResponse, ScrapeApiResponse, StatusResponse};
