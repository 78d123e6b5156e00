// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod scrape;
pub mod serve;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::scrape::{ScrapeConfig, ScrapeRouter};

/// Scrape router
#[derive(Parser, Debug)]
#[command(name = "scrape-router")]
#[command(version)]
#[command(about = "Fetch a page's main content through the cheapest backend that works", long_about = None)]
pub struct Cli {
    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve(serve::ServeArgs),

    /// Scrape one URL and print the JSON result
    Scrape(scrape::ScrapeArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Serve(args)) => serve::run(args).await,
        Some(Commands::Scrape(args)) => scrape::run(args).await,
        None => serve::run(serve::ServeArgs::from_env()).await,
    }
}

/// Router from the environment, with an optional tables file override
pub(crate) fn build_router(tables: Option<PathBuf>) -> Result<ScrapeRouter> {
    let mut config = ScrapeConfig::from_env();
    if tables.is_some() {
        config.tables_path = tables;
    }
    Ok(ScrapeRouter::from_config(&config)?)
}
