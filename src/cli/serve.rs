// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::start_server;
use crate::scrape::ScrapeRouter;
use crate::version::get_version_string;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "API_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Routing tables TOML file
    #[arg(long, env = "ROUTING_TABLES_PATH")]
    pub tables: Option<PathBuf>,
}

impl ServeArgs {
    /// Same defaults clap applies, for when no subcommand was given
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            tables: std::env::var("ROUTING_TABLES_PATH").ok().map(PathBuf::from),
        }
    }
}

pub async fn run(args: ServeArgs) -> Result<()> {
    info!("Starting {}", get_version_string());

    let router = Arc::new(super::build_router(args.tables.clone())?);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;

    if let Some(path) = args.tables {
        spawn_table_reloader(router.clone(), path)?;
    }

    start_server(addr, router).await
}

/// Re-read the routing tables file on SIGHUP
#[cfg(unix)]
fn spawn_table_reloader(router: Arc<ScrapeRouter>, path: PathBuf) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup =
        signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;
    info!("Send SIGHUP to reload routing tables from {}", path.display());

    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            reload_tables_file(&router, &path).await;
        }
    });
    Ok(())
}

#[cfg(not(unix))]
fn spawn_table_reloader(_router: Arc<ScrapeRouter>, path: PathBuf) -> Result<()> {
    warn!(
        "Routing tables from {} are only reloaded on restart on this platform",
        path.display()
    );
    Ok(())
}

/// Swap in the tables file, keeping the current tables if it cannot be loaded
pub(crate) async fn reload_tables_file(router: &ScrapeRouter, path: &Path) -> bool {
    match router.reload_tables_from(path).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Keeping current routing tables: {}", e);
            false
        }
    }
}
