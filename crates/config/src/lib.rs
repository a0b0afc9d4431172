//! Tally Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use tally_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[sources.modrinth]\ntype = \"modrinth\"").unwrap();
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [scheduler]
//! cron = "0 0 */3 * * *"
//!
//! [sources.modrinth]
//! type = "modrinth"
//!
//! [[projects]]
//! id = "show-me-your-skin"
//! source_ids = { modrinth = "show-me-your-skin" }
//! ```
//!
//! See `configs/example.toml` for all available options.

mod error;
mod logging;
mod scheduler;
mod server;
mod sources;
mod storage;
mod tracking;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogLevel};
pub use scheduler::SchedulerConfig;
pub use server::ServerConfig;
pub use sources::{SourceConfig, SourcesConfig};
pub use storage::StorageConfig;
pub use tracking::{TrackedProjectConfig, TrackedUserConfig};

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Ingestion cadence
    pub scheduler: SchedulerConfig,

    /// Snapshot store location
    pub storage: StorageConfig,

    /// External data sources, keyed by name
    pub sources: SourcesConfig,

    /// Tracked users (projects discovered through each linked source)
    pub users: Vec<TrackedUserConfig>,

    /// Directly tracked projects
    pub projects: Vec<TrackedProjectConfig>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Checks for:
    /// - Entity links referencing sources that exist
    /// - A parseable cron expression
    /// - Unique tracked entity ids
    /// - Sane storage path and timeouts
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
