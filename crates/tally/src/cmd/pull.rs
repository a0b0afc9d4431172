//! Pull command - run one ingestion tick immediately
//!
//! Useful for seeding a fresh store or verifying source credentials
//! without waiting for the next scheduled tick.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use tally_connectors::IngestScheduler;
use tally_store::StatsDb;

use super::{build_adapters, build_plan, load_config, spawn_writer};

/// Pull command arguments
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Path to configuration file (defaults to config.toml if not specified)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the pull command
pub async fn run(args: PullArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let db = Arc::new(
        StatsDb::open(&config.storage.path)
            .await
            .context("failed to open snapshot store")?,
    );

    let adapters = build_adapters(&config)?;
    let plan = build_plan(&config);
    if plan.is_empty() {
        info!("no tracked users or projects configured, nothing to pull");
        return Ok(());
    }

    let (observations, writer) = spawn_writer(Arc::clone(&db));
    let scheduler = IngestScheduler::new(&config.scheduler.cron, adapters, plan, observations)
        .context("invalid scheduler configuration")?;

    let (written, failed) = scheduler.run_once().await;

    // Dropping the scheduler closes the channel; wait for the writer to
    // flush every queued observation before exiting.
    drop(scheduler);
    writer.await.context("writer task failed")?;

    info!(written, failed, "pull complete");
    Ok(())
}
