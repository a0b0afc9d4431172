//! Snapshot data model
//!
//! One snapshot is one observation of one entity's counters from one source
//! at one instant. Snapshots are immutable once written; history is
//! append-only, and within a (source, entity) partition snapshots are
//! totally ordered by timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observation of one entity from one source at one instant
///
/// Counters are assumed monotonically non-decreasing by the source; this is
/// not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Name of the originating external source, as configured
    pub source: String,

    /// Stable identifier of the tracked project
    pub entity: String,

    /// Instant the observation was taken (millisecond resolution)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Cumulative download count
    pub downloads: u64,

    /// Follower count, if the source reports one
    pub followers: Option<u64>,

    /// Number of published versions at observation time
    pub versions: u64,
}

/// One balance observation for one user from one source
///
/// Revenue history is a raw pass-through on the query side; it is never
/// downsampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueObservation {
    /// Name of the originating external source, as configured
    pub source: String,

    /// Stable identifier of the tracked user
    pub user: String,

    /// Instant the observation was taken (millisecond resolution)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// Lifetime earnings reported by the source
    pub all_time_balance: f64,

    /// Currently withdrawable balance
    pub balance: f64,
}
