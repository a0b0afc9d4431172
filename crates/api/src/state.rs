//! Application state
//!
//! Shared state for API handlers.

use std::sync::Arc;

use tally_store::StatsDb;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Snapshot store handle
    pub db: Arc<StatsDb>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: Arc<StatsDb>) -> Self {
        Self { db }
    }
}
