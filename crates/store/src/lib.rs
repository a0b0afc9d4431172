//! Tally - Snapshot Store
//!
//! Append-only persistence for counter snapshots and revenue observations,
//! backed by Turso (async SQLite-compatible).
//!
//! # Overview
//!
//! - [`StatsDb`] owns the database handle and initializes the schema
//! - [`SnapshotRepo`] appends and queries the `stats` table
//! - [`RevenueRepo`] appends and queries the `revenue` table
//!
//! Both tables are append-only: rows are never updated or deleted, and
//! queries return ascending timestamp order with ties broken by insertion
//! order.
//!
//! # Example
//!
//! ```ignore
//! use tally_store::StatsDb;
//!
//! let db = StatsDb::open("data/stats.db").await?;
//! db.snapshots().append(&snapshot).await?;
//! let history = db.snapshots().for_source("modrinth").await?;
//! ```

pub mod db;
pub mod error;
pub mod repos;


// Re-exports
pub use db::StatsDb;
pub use error::{Result, StoreError};
pub use repos::{RevenueRepo, SnapshotRepo};
