//! Tracked entity configuration
//!
//! Users and projects are tracked under a stable id of their own, with a
//! map from source name to the id that source knows them by.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A tracked user
///
/// Each tick samples every project published by the user on each linked
/// source, plus the user's payout balance where the source reports one.
///
/// # Example
///
/// ```toml
/// [[users]]
/// id = "alice"
/// source_ids = { modrinth = "abc123DEF" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TrackedUserConfig {
    /// Stable id, independent of any source
    pub id: String,

    /// Map from source name to this user's id on that source
    #[serde(default)]
    pub source_ids: BTreeMap<String, String>,
}

/// A directly tracked project
///
/// # Example
///
/// ```toml
/// [[projects]]
/// id = "show-me-your-skin"
/// source_ids = { modrinth = "show-me-your-skin", curseforge = "459496" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TrackedProjectConfig {
    /// Stable id, independent of any source; snapshots are written under it
    pub id: String,

    /// Map from source name to this project's id on that source
    #[serde(default)]
    pub source_ids: BTreeMap<String, String>,
}
