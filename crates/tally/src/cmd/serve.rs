//! Serve command - run the Tally server
//!
//! Wires the snapshot store, the ingestion scheduler, and the HTTP query
//! surface together. The write path (scheduler -> writer -> store) and the
//! read path (HTTP -> store -> engine) share nothing but the database.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use tally_api::{AppState, build_router};
use tally_config::Config;
use tally_connectors::IngestScheduler;
use tally_store::StatsDb;

use super::{build_adapters, build_plan, load_config, spawn_writer};

/// Serve command arguments
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file (defaults to config.toml if not specified)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        "tally starting"
    );

    let config = load_config(args.config.as_deref())?;
    run_server(config).await?;

    info!("tally shutdown complete");
    Ok(())
}

/// Main server run loop
async fn run_server(config: Config) -> Result<()> {
    let db = Arc::new(
        StatsDb::open(&config.storage.path)
            .await
            .context("failed to open snapshot store")?,
    );

    // Ingestion: scheduler -> observation channel -> writer -> store
    let adapters = build_adapters(&config)?;
    let plan = build_plan(&config);
    if plan.is_empty() {
        info!("no tracked users or projects configured, nothing will be ingested");
    }

    let (observations, writer) = spawn_writer(Arc::clone(&db));
    let scheduler = IngestScheduler::new(&config.scheduler.cron, adapters, plan, observations)
        .context("invalid scheduler configuration")?
        .with_check_interval(Duration::from_secs(config.scheduler.check_interval_secs));
    let scheduler_handle = tokio::spawn(scheduler.run());

    // Query surface
    let state = AppState::new(Arc::clone(&db));
    let app = build_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    scheduler_handle.abort();
    writer.abort();
    Ok(())
}

/// Wait for ctrl-c
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown signal handler");
        return;
    }
    info!("shutdown signal received");
}
