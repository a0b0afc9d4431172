//! API routes
//!
//! One module per endpoint group.

pub mod downloads;
pub mod ops;
pub mod revenue;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(ops::routes())
        .merge(downloads::routes())
        .merge(revenue::routes())
        .with_state(state)
}
