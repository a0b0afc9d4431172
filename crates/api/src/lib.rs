//! Tally API
//!
//! HTTP query surface over the snapshot store.
//!
//! # Overview
//!
//! This crate provides the read path: it loads snapshot history from
//! `tally-store`, runs the `tally-engine` downsampler per entity, and
//! serializes buckets. It shares nothing with the write path beyond the
//! database - a query may legitimately miss the snapshot from an
//! in-flight ingestion tick.
//!
//! # Usage
//!
//! ```ignore
//! use tally_api::{AppState, build_router};
//!
//! let state = AppState::new(db);
//! let app = build_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! # Endpoints
//!
//! - `GET /downloads/{source}` - downsampled download history for every
//!   entity tracked under a source
//! - `GET /revenue/{user}/{source}` - raw balance history for one user
//! - `GET /health` - liveness probe
//!
//! # Query Parameters
//!
//! `/downloads/{source}` accepts:
//! - `hours` - bucket width in hours (default 24, must be >= 1)
//! - `falloff` - emit a trailing bucket for the most recent partial window
//!   (default false)

pub mod error;
pub mod routes;
pub mod state;

// Re-exports
pub use error::{ApiError, Result};
pub use routes::build_router;
pub use state::AppState;
