//! Modrinth adapter
//!
//! Fetches project counters, user project listings, and payout balances
//! from the Modrinth API (`/project/{id}`, `/user/{id}/projects`,
//! `/user/{id}/payouts`).

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::config::AdapterConfig;
use crate::error::ConnectorError;
use crate::traits::{PayoutBalance, ProjectStats, SourceAdapter, UserProject};

/// Default Modrinth API base URL
pub const DEFAULT_API_URL: &str = "https://api.modrinth.com/v2";

/// Modrinth source adapter
pub struct Modrinth {
    api_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl Modrinth {
    /// Create a Modrinth adapter from source settings
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client creation fails (e.g., TLS
    /// misconfiguration)
    pub fn from_config(config: &AdapterConfig) -> Result<Self, ConnectorError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tally/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConnectorError::Init(format!("Modrinth HTTP client: {}", e)))?;

        Ok(Self {
            api_url: config.base_url_or(DEFAULT_API_URL),
            token: config.token.clone(),
            client,
        })
    }

    /// Build a request with optional auth
    ///
    /// Modrinth expects the raw token in the Authorization header.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url);
        if let Some(ref token) = self.token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }
        request
    }

    /// Map common HTTP error statuses
    fn handle_error_status(&self, response: reqwest::Response, what: &str) -> ConnectorError {
        match response.status() {
            reqwest::StatusCode::NOT_FOUND => ConnectorError::NotFound(what.to_string()),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                ConnectorError::AuthFailed("invalid or missing token".into())
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get("x-ratelimit-reset")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60);
                ConnectorError::RateLimited { retry_after_secs }
            }
            _ => ConnectorError::Http(response.error_for_status().unwrap_err()),
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<T, ConnectorError> {
        let response = self.build_request(url).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.handle_error_status(response, what))
        }
    }
}

impl SourceAdapter for Modrinth {
    fn name(&self) -> &'static str {
        "modrinth"
    }

    async fn project_stats(&self, remote_id: &str) -> Result<ProjectStats, ConnectorError> {
        let url = format!("{}/project/{}", self.api_url, remote_id);
        let project: ModrinthProject = self.fetch_json(&url, remote_id).await?;

        debug!(
            adapter = "modrinth",
            project = remote_id,
            downloads = project.downloads,
            "fetched project stats"
        );

        Ok(project.into_stats())
    }

    async fn user_projects(
        &self,
        remote_user_id: &str,
    ) -> Result<Vec<UserProject>, ConnectorError> {
        let url = format!("{}/user/{}/projects", self.api_url, remote_user_id);
        let projects: Vec<ModrinthProject> = self.fetch_json(&url, remote_user_id).await?;

        debug!(
            adapter = "modrinth",
            user = remote_user_id,
            projects = projects.len(),
            "fetched user projects"
        );

        Ok(projects
            .into_iter()
            .map(|project| UserProject {
                slug: project.slug.clone(),
                stats: project.into_stats(),
            })
            .collect())
    }

    async fn payout_balance(&self, remote_user_id: &str) -> Result<PayoutBalance, ConnectorError> {
        let url = format!("{}/user/{}/payouts", self.api_url, remote_user_id);
        let payouts: ModrinthPayouts = self.fetch_json(&url, remote_user_id).await?;

        Ok(PayoutBalance {
            all_time: payouts.all_time,
            balance: payouts.balance,
        })
    }
}

// --- API Response Types ---

/// Project as returned by `/project/{id}` and `/user/{id}/projects`
#[derive(Debug, Deserialize)]
struct ModrinthProject {
    #[serde(default)]
    slug: String,
    downloads: u64,
    followers: u64,
    /// Version ids; only the count matters here
    #[serde(default)]
    versions: Vec<String>,
}

impl ModrinthProject {
    fn into_stats(self) -> ProjectStats {
        ProjectStats {
            downloads: self.downloads,
            followers: Some(self.followers),
            versions: self.versions.len() as u64,
        }
    }
}

/// Payout summary as returned by `/user/{id}/payouts`
#[derive(Debug, Deserialize)]
struct ModrinthPayouts {
    all_time: f64,
    balance: f64,
}
