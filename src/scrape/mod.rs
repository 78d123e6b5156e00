// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Website scraping with backend fallback
//!
//! Fetches a page's main-content text while spending as little as possible:
//! - Hosts are classified (direct, unlocker, js-render) from domain lists
//! - Each class has a fixed, ordered plan of fetch backends
//! - Every payload is extracted and validated before it is trusted
//! - The first accepted payload wins, otherwise every attempt is reported

pub mod backend;
pub mod classifier;
pub mod config;
pub mod direct;
pub mod encoding;
pub mod extractor;
pub mod proxy;
pub mod registry;
pub mod render;
pub mod router;
pub mod tables;
pub(crate) mod transport;
pub mod types;
pub mod unlocker;
pub mod validator;

// Re-export commonly used types
pub use backend::{BackendId, FetchBackend, FetchedPage, TransportKind};
pub use classifier::{normalize_url, DomainClassifier};
pub use config::{ScrapeConfig, ValidationThresholds};
pub use extractor::{clean_text, extract};
pub use registry::{BackendDescriptor, BackendRegistry};
pub use router::{RouterInitError, ScrapeOptions, ScrapeRouter};
pub use tables::{RoutingTables, TablesError};
pub use types::{
    Attempt, AttemptOutcome, FailureKind, FetchError, ReasonCode, RoutingClass, ScrapeError,
    ScrapeOutcome, ValidationVerdict,
};
pub use validator::ContentValidator;
