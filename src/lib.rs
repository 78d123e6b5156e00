// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod scrape;
pub mod version;

// Re-export main types
pub use scrape::{
    BackendId, FailureKind, RoutingClass, ScrapeConfig, ScrapeError, ScrapeOptions,
    ScrapeOutcome, ScrapeRouter,
};
