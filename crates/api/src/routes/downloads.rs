//! Download history routes
//!
//! # Routes
//!
//! - `GET /downloads/{source}` - downsampled, delta-annotated download
//!   history for every entity tracked under a source

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::TimeDelta;
use serde::Deserialize;
use tally_engine::{Bucket, Downsampler};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the downloads router
pub fn routes() -> Router<AppState> {
    Router::new().route("/downloads/{source}", get(downloads_for_source))
}

/// Query parameters for the downloads endpoint
#[derive(Debug, Deserialize)]
pub struct DownloadsParams {
    /// Bucket width in hours (default 24)
    #[serde(default = "default_hours")]
    pub hours: i64,

    /// Emit a trailing bucket for the most recent partial window
    #[serde(default)]
    pub falloff: bool,
}

fn default_hours() -> i64 {
    24
}

/// Widest accepted bucket, 10 years of hours
const MAX_HOURS: i64 = 87_600;

/// Downsampled download history for one source
///
/// GET /downloads/{source}?hours=24&falloff=false
///
/// Loads the source's full snapshot history in ascending order and folds
/// it through the downsampler, one independent window per entity. The
/// response is a flat ordered list of buckets; an unknown source simply
/// has no snapshots and yields an empty list.
async fn downloads_for_source(
    State(state): State<AppState>,
    Path(source): Path<String>,
    Query(params): Query<DownloadsParams>,
) -> Result<Json<Vec<Bucket>>, ApiError> {
    if params.hours < 1 || params.hours > MAX_HOURS {
        return Err(ApiError::validation(
            "hours",
            format!("must be between 1 and {}", MAX_HOURS),
        ));
    }

    let snapshots = state.db.snapshots().for_source(&source).await?;
    let buckets = Downsampler::run(&snapshots, TimeDelta::hours(params.hours), params.falloff);

    Ok(Json(buckets))
}
