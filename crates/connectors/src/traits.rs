//! Source adapter trait definition

use crate::error::ConnectorError;

/// Counters reported by a source for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStats {
    /// Cumulative download count
    pub downloads: u64,
    /// Follower count, if the source has the concept
    pub followers: Option<u64>,
    /// Number of published versions
    pub versions: u64,
}

/// One project listed under a user's account, with its counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProject {
    /// Source-reported project slug
    pub slug: String,
    /// Counters at fetch time
    pub stats: ProjectStats,
}

/// A user's payout balance as reported by a source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoutBalance {
    /// Lifetime earnings
    pub all_time: f64,
    /// Currently withdrawable balance
    pub balance: f64,
}

/// Trait for pull-based source adapters
///
/// Adapters fetch point-in-time counter data from external services
/// (Modrinth, CurseForge, ...) and normalize it into the shared stat
/// types. Every adapter exposes the same three operations; a source that
/// lacks one returns [`ConnectorError::Unsupported`] so callers can treat
/// the gap as a capability, not a failure.
pub trait SourceAdapter: Send + Sync {
    /// Returns the adapter name (e.g., "modrinth", "curseforge")
    fn name(&self) -> &'static str;

    /// Fetch counters for one project
    ///
    /// # Arguments
    /// * `remote_id` - The project's identifier on this source
    fn project_stats(
        &self,
        remote_id: &str,
    ) -> impl std::future::Future<Output = Result<ProjectStats, ConnectorError>> + Send;

    /// Fetch counters for every project published by one user
    ///
    /// # Arguments
    /// * `remote_user_id` - The user's identifier on this source
    fn user_projects(
        &self,
        remote_user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<UserProject>, ConnectorError>> + Send;

    /// Fetch one user's payout balance
    fn payout_balance(
        &self,
        remote_user_id: &str,
    ) -> impl std::future::Future<Output = Result<PayoutBalance, ConnectorError>> + Send;
}
