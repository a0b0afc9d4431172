//! Scheduler configuration

use serde::Deserialize;

/// Ingestion cadence settings
///
/// The cron expression uses six fields (seconds first).
///
/// # Example
///
/// ```toml
/// [scheduler]
/// cron = "0 0 */3 * * *"   # every 3 hours
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Cron expression for ingestion ticks
    /// Default: every 3 hours
    pub cron: String,

    /// How often the scheduler checks whether a tick is due, in seconds
    /// Default: 60
    pub check_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cron: "0 0 */3 * * *".to_string(),
            check_interval_secs: 60,
        }
    }
}
