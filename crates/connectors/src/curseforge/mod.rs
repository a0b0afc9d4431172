//! CurseForge adapter
//!
//! Fetches mod download and version counters from the CurseForge Core API
//! (`/v1/mods/{id}`, `/v1/mods/{id}/files`). CurseForge has no follower
//! counter and no public payout endpoint, so those operations report
//! `Unsupported` and followers stay absent.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::AdapterConfig;
use crate::error::ConnectorError;
use crate::traits::{PayoutBalance, ProjectStats, SourceAdapter, UserProject};

/// Default CurseForge Core API base URL
pub const DEFAULT_API_URL: &str = "https://api.curseforge.com";

/// CurseForge source adapter
pub struct CurseForge {
    api_url: String,
    client: reqwest::Client,
}

impl CurseForge {
    /// Create a CurseForge adapter from source settings
    ///
    /// # Errors
    ///
    /// Returns error if no API key is configured or HTTP client creation
    /// fails; every CurseForge Core API call requires a key.
    pub fn from_config(config: &AdapterConfig) -> Result<Self, ConnectorError> {
        let token = config
            .token
            .as_deref()
            .ok_or_else(|| ConnectorError::Init("CurseForge requires an API key".into()))?;

        let mut headers = reqwest::header::HeaderMap::new();
        let mut key = reqwest::header::HeaderValue::from_str(token)
            .map_err(|e| ConnectorError::Init(format!("CurseForge API key: {}", e)))?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);

        let client = reqwest::Client::builder()
            .user_agent(concat!("tally/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ConnectorError::Init(format!("CurseForge HTTP client: {}", e)))?;

        Ok(Self {
            api_url: config.base_url_or(DEFAULT_API_URL),
            client,
        })
    }

    /// Map common HTTP error statuses
    fn handle_error_status(&self, response: reqwest::Response, what: &str) -> ConnectorError {
        match response.status() {
            reqwest::StatusCode::NOT_FOUND => ConnectorError::NotFound(what.to_string()),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                ConnectorError::AuthFailed("invalid API key".into())
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                ConnectorError::RateLimited { retry_after_secs: 60 }
            }
            _ => ConnectorError::Http(response.error_for_status().unwrap_err()),
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<T, ConnectorError> {
        let response = self.client.get(url).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.handle_error_status(response, what))
        }
    }

    /// Total published file count for a mod
    ///
    /// One extra request; `/v1/mods/{id}` only carries the latest files.
    async fn fetch_version_count(&self, remote_id: &str) -> Result<u64, ConnectorError> {
        let url = format!("{}/v1/mods/{}/files?pageSize=1", self.api_url, remote_id);
        let files: CurseForgeFiles = self.fetch_json(&url, remote_id).await?;
        Ok(files.pagination.total_count)
    }
}

impl SourceAdapter for CurseForge {
    fn name(&self) -> &'static str {
        "curseforge"
    }

    async fn project_stats(&self, remote_id: &str) -> Result<ProjectStats, ConnectorError> {
        let url = format!("{}/v1/mods/{}", self.api_url, remote_id);
        let envelope: CurseForgeEnvelope = self.fetch_json(&url, remote_id).await?;
        let data = envelope.data;

        let versions = match self.fetch_version_count(remote_id).await {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    adapter = "curseforge",
                    project = remote_id,
                    error = %e,
                    "failed to fetch file count, falling back to latest file indexes"
                );
                data.latest_files_indexes.len() as u64
            }
        };

        debug!(
            adapter = "curseforge",
            project = remote_id,
            downloads = data.download_count,
            "fetched project stats"
        );

        Ok(ProjectStats {
            downloads: data.download_count,
            followers: None,
            versions,
        })
    }

    async fn user_projects(
        &self,
        _remote_user_id: &str,
    ) -> Result<Vec<UserProject>, ConnectorError> {
        Err(ConnectorError::unsupported("curseforge", "user project listings"))
    }

    async fn payout_balance(&self, _remote_user_id: &str) -> Result<PayoutBalance, ConnectorError> {
        Err(ConnectorError::unsupported("curseforge", "payout balances"))
    }
}

// --- API Response Types ---

/// CurseForge wraps every response in a `data` envelope
#[derive(Debug, Deserialize)]
struct CurseForgeEnvelope {
    data: CurseForgeMod,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurseForgeMod {
    download_count: u64,
    #[serde(default)]
    latest_files_indexes: Vec<CurseForgeFileIndex>,
}

/// Entry in `latestFilesIndexes`; only its presence is counted
#[derive(Debug, Deserialize)]
struct CurseForgeFileIndex {}

#[derive(Debug, Deserialize)]
struct CurseForgeFiles {
    pagination: CurseForgePagination,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurseForgePagination {
    total_count: u64,
}
