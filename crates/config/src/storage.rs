//! Storage configuration

use serde::Deserialize;

/// Snapshot store location
///
/// # Example
///
/// ```toml
/// [storage]
/// path = "data/stats.db"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path; parent directories are created on startup
    /// Default: data/stats.db
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "data/stats.db".to_string(),
        }
    }
}
