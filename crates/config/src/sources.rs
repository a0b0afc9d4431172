//! Source configuration
//!
//! Each `[sources.<name>]` section configures one external data source.
//! The `type` selects the adapter implementation; the rest are connection
//! settings.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Container for all configured sources
///
/// Sources are stored as a map of name -> config. A BTreeMap keeps
/// iteration order stable across runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Named source instances
    #[serde(flatten)]
    sources: BTreeMap<String, SourceConfig>,
}

impl SourcesConfig {
    /// Get a source config by name
    pub fn get(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.get(name)
    }

    /// Check if a source exists
    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    /// Iterate over all sources
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SourceConfig)> {
        self.sources.iter()
    }

    /// Get the number of configured sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if no sources are configured
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Get all source names
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.sources.keys()
    }
}

/// Configuration for one external data source
///
/// # Example
///
/// ```toml
/// [sources.modrinth]
/// type = "modrinth"
/// token = "mrp_xxx"        # optional, needed for payout balances
/// timeout_secs = 30        # optional, per-request timeout
///
/// [sources.curseforge]
/// type = "curseforge"
/// token = "$2a$10$..."     # required API key
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Adapter type (e.g., "modrinth", "curseforge")
    #[serde(rename = "type")]
    pub kind: String,

    /// API base URL override (default: the adapter's public API)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Auth token or API key
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_parse_as_named_map() {
        let sources: SourcesConfig = toml::from_str(
            r#"
            [modrinth]
            type = "modrinth"

            [curseforge]
            type = "curseforge"
            token = "key"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(sources.len(), 2);
        assert!(sources.contains("modrinth"));
        assert_eq!(sources.get("modrinth").unwrap().timeout_secs, 30);
        assert_eq!(sources.get("curseforge").unwrap().timeout_secs, 5);
    }

    #[test]
    fn test_source_names_are_sorted() {
        let sources: SourcesConfig = toml::from_str(
            r#"
            [zeta]
            type = "modrinth"

            [alpha]
            type = "modrinth"
            "#,
        )
        .unwrap();

        let names: Vec<&String> = sources.names().collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
