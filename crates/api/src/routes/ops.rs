//! Operations routes
//!
//! Liveness probe for monitoring. No authentication.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Build the operations router
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Server status
    pub status: &'static str,
}

/// Health check
///
/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
