// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;

use crate::api::{ApiError, ScrapeApiRequest, ScrapeApiResponse};
use crate::scrape::ScrapeOptions;

/// Arguments for the scrape command
#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Target URL, scheme optional
    pub url: String,

    /// Route through a rendering backend regardless of host
    #[arg(long)]
    pub force_render: bool,

    /// Use exactly this backend (e.g. web_unlocker_api)
    #[arg(long)]
    pub backend: Option<String>,

    /// Routing tables TOML file
    #[arg(long, env = "ROUTING_TABLES_PATH")]
    pub tables: Option<PathBuf>,
}

/// Scrape one URL and print the same JSON envelope the API returns
pub async fn run(args: ScrapeArgs) -> Result<()> {
    let request = ScrapeApiRequest {
        url: Some(args.url.clone()),
        force_render: args.force_render,
        backend: args.backend,
    };

    let result = match checked_options(&request) {
        Ok(options) => {
            let router = super::build_router(args.tables)?;
            router
                .scrape(request.target(), options)
                .await
                .map(ScrapeApiResponse::from)
                .map_err(|e| ApiError::from_scrape(e, request.target()))
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(err) => {
            let body = err.to_response();
            println!("{}", serde_json::to_string_pretty(&body)?);
            Err(anyhow!("{}", body.error))
        }
    }
}

/// Apply the API's input checks before any backend is built
fn checked_options(request: &ScrapeApiRequest) -> Result<ScrapeOptions, ApiError> {
    request
        .validate()
        .and_then(|()| request.options())
        .map_err(|e| ApiError::invalid(e, Some(request.target().to_string())))
}
