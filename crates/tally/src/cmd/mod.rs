//! CLI commands

pub mod pull;
pub mod serve;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use tally_config::Config;
use tally_connectors::{
    Adapter, AdapterConfig, IngestPlan, Observation, SourceLink, TrackedProject, TrackedUser,
};
use tally_store::StatsDb;

/// Load configuration
///
/// An explicitly provided path must exist; otherwise `config.toml` is
/// tried and defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            Config::from_file(path).context("failed to load configuration")
        }
        None => {
            let default_path = PathBuf::from("config.toml");
            if default_path.exists() {
                info!(config = %default_path.display(), "using config file");
                Config::from_file(&default_path).context("failed to load configuration")
            } else {
                info!("no config file found, using defaults");
                Ok(Config::default())
            }
        }
    }
}

/// Build one adapter per configured source
pub fn build_adapters(config: &Config) -> Result<HashMap<String, Arc<Adapter>>> {
    let mut adapters = HashMap::new();

    for (name, source) in config.sources.iter() {
        let adapter_config = AdapterConfig {
            base_url: source.base_url.clone(),
            token: source.token.clone(),
            timeout_secs: source.timeout_secs,
        };
        let adapter = Adapter::from_kind(&source.kind, &adapter_config)
            .with_context(|| format!("failed to configure source '{}'", name))?;

        info!(source = %name, kind = %source.kind, "configured source adapter");
        adapters.insert(name.clone(), Arc::new(adapter));
    }

    Ok(adapters)
}

/// Build the ingestion plan from tracked entities
pub fn build_plan(config: &Config) -> IngestPlan {
    let users = config
        .users
        .iter()
        .map(|user| TrackedUser {
            id: user.id.clone(),
            links: source_links(&user.source_ids),
        })
        .collect::<Vec<_>>();

    let projects = config
        .projects
        .iter()
        .map(|project| TrackedProject {
            id: project.id.clone(),
            links: source_links(&project.source_ids),
        })
        .collect::<Vec<_>>();

    info!(
        users = users.len(),
        projects = projects.len(),
        "tracking entities"
    );

    IngestPlan { users, projects }
}

fn source_links(source_ids: &std::collections::BTreeMap<String, String>) -> Vec<SourceLink> {
    source_ids
        .iter()
        .map(|(source, remote_id)| SourceLink {
            source: source.clone(),
            remote_id: remote_id.clone(),
        })
        .collect()
}

/// Spawn the single writer task that drains observations into the store
///
/// All appends go through this one task, which serializes writes per
/// partition. A persistence failure is logged and that observation is
/// skipped; the next tick is the only retry.
pub fn spawn_writer(db: Arc<StatsDb>) -> (mpsc::Sender<Observation>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<Observation>(256);

    let handle = tokio::spawn(async move {
        while let Some(observation) = rx.recv().await {
            let result = match &observation {
                Observation::Stats(snapshot) => db.snapshots().append(snapshot).await,
                Observation::Revenue(observation) => db.revenue().append(observation).await,
            };
            if let Err(e) = result {
                warn!(error = %e, "failed to persist observation, skipping");
            }
        }
    });

    (tx, handle)
}
