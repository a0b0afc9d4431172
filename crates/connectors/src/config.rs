//! Adapter configuration
//!
//! Connection settings shared by every adapter. The per-source values come
//! from the `[sources.<name>]` config sections; adapter-specific defaults
//! (base URL, auth header shape) are applied by each adapter's constructor.

/// Connection settings for one configured source
#[derive(Debug, Clone)]
pub struct AdapterConfig {
    /// API base URL; `None` uses the adapter's default
    pub base_url: Option<String>,

    /// Auth token, where the source requires or rewards one
    pub token: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: 30,
        }
    }
}

impl AdapterConfig {
    /// Resolve the effective base URL against an adapter default
    ///
    /// Trailing slashes are trimmed so path concatenation stays uniform.
    pub fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_token() {
        let config = AdapterConfig::default();
        assert!(config.base_url.is_none());
        assert!(config.token.is_none());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_base_url_fallback() {
        let config = AdapterConfig::default();
        assert_eq!(config.base_url_or("https://api.example.com"), "https://api.example.com");
    }

    #[test]
    fn test_base_url_override_trims_trailing_slash() {
        let config = AdapterConfig {
            base_url: Some("http://localhost:9000/".into()),
            ..Default::default()
        };
        assert_eq!(config.base_url_or("https://api.example.com"), "http://localhost:9000");
    }
}
