//! Tally - Connectors
//!
//! Pull-based source adapters that fetch counter data from external
//! services and the scheduler that drives them on a cron cadence.
//!
//! # Available Adapters
//!
//! - **Modrinth** - project download/follower/version counters, user
//!   project listings, payout balances
//! - **CurseForge** - project download/version counters (no follower or
//!   payout data)
//!
//! # Design Principles
//!
//! - **Pull-based**: adapters fetch point-in-time snapshots on schedule
//! - **Capability-polymorphic**: every adapter exposes the same three
//!   operations; unsupported ones return a typed error the scheduler
//!   downgrades to a debug log
//! - **Failure isolation**: one entity's fetch failure never aborts the
//!   remaining entities of the same tick
//! - **No in-tick retries**: the next scheduled tick is the only retry
//!   mechanism; every request carries a timeout so one slow source cannot
//!   stall a tick
//!
//! # Example
//!
//! ```ignore
//! use tally_connectors::{Adapter, AdapterConfig};
//!
//! let adapter = Adapter::from_kind("modrinth", &AdapterConfig::default())?;
//! let stats = adapter.project_stats("some-mod").await?;
//! ```

pub mod config;
mod curseforge;
mod error;
mod modrinth;
mod plan;
mod scheduler;
mod traits;

// Re-exports
pub use config::AdapterConfig;
pub use curseforge::CurseForge;
pub use error::ConnectorError;
pub use modrinth::Modrinth;
pub use plan::{IngestPlan, SourceLink, TrackedProject, TrackedUser};
pub use scheduler::{IngestScheduler, Observation};
pub use traits::{PayoutBalance, ProjectStats, SourceAdapter, UserProject};

/// Runtime-selected source adapter
///
/// Enum dispatch keeps the scheduler free of `dyn`; the variant is chosen
/// from the source's configured `type` at startup.
pub enum Adapter {
    Modrinth(Modrinth),
    CurseForge(CurseForge),
}

impl Adapter {
    /// Construct an adapter for a configured source type
    pub fn from_kind(kind: &str, config: &AdapterConfig) -> Result<Self, ConnectorError> {
        match kind {
            "modrinth" => Ok(Self::Modrinth(Modrinth::from_config(config)?)),
            "curseforge" => Ok(Self::CurseForge(CurseForge::from_config(config)?)),
            other => Err(ConnectorError::UnknownSourceType(other.to_string())),
        }
    }

    /// Adapter name (the source `type` it was built from)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Modrinth(m) => m.name(),
            Self::CurseForge(c) => c.name(),
        }
    }

    /// Fetch counters for one project
    pub async fn project_stats(&self, remote_id: &str) -> Result<ProjectStats, ConnectorError> {
        match self {
            Self::Modrinth(m) => m.project_stats(remote_id).await,
            Self::CurseForge(c) => c.project_stats(remote_id).await,
        }
    }

    /// Fetch counters for every project of one user
    pub async fn user_projects(
        &self,
        remote_user_id: &str,
    ) -> Result<Vec<UserProject>, ConnectorError> {
        match self {
            Self::Modrinth(m) => m.user_projects(remote_user_id).await,
            Self::CurseForge(c) => c.user_projects(remote_user_id).await,
        }
    }

    /// Fetch one user's payout balance
    pub async fn payout_balance(
        &self,
        remote_user_id: &str,
    ) -> Result<PayoutBalance, ConnectorError> {
        match self {
            Self::Modrinth(m) => m.payout_balance(remote_user_id).await,
            Self::CurseForge(c) => c.payout_balance(remote_user_id).await,
        }
    }
}

/// List of source types this build knows how to construct
pub fn available_adapters() -> &'static [&'static str] {
    &["modrinth", "curseforge"]
}
