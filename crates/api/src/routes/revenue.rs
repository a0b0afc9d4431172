//! Revenue history routes
//!
//! # Routes
//!
//! - `GET /revenue/{user}/{source}` - raw ascending balance history for
//!   one user on one source (pass-through, never downsampled)

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the revenue router
pub fn routes() -> Router<AppState> {
    Router::new().route("/revenue/{user}/{source}", get(revenue_for_user))
}

/// One balance observation on the wire
#[derive(Debug, Serialize)]
pub struct RevenuePoint {
    /// Observation instant (Unix milliseconds)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Lifetime earnings
    pub all_time_balance: f64,
    /// Currently withdrawable balance
    pub balance: f64,
}

/// Raw balance history for one user on one source
///
/// GET /revenue/{user}/{source}
async fn revenue_for_user(
    State(state): State<AppState>,
    Path((user, source)): Path<(String, String)>,
) -> Result<Json<Vec<RevenuePoint>>, ApiError> {
    let observations = state.db.revenue().for_user(&user, &source).await?;

    let points = observations
        .into_iter()
        .map(|observation| RevenuePoint {
            timestamp: observation.timestamp,
            all_time_balance: observation.all_time_balance,
            balance: observation.balance,
        })
        .collect();

    Ok(Json(points))
}
