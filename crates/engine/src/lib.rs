//! Tally - Downsampling Engine
//!
//! The pure core of Tally: turns an ordered stream of raw counter snapshots
//! into fixed-width time buckets carrying both absolute values and deltas
//! since the bucket's start.
//!
//! # Overview
//!
//! - **Snapshots**: immutable, timestamped observations of one entity's
//!   counters from one source ([`Snapshot`], [`RevenueObservation`])
//! - **Buckets**: downsampled reporting windows computed on demand
//!   ([`Bucket`])
//! - **Engine**: a pure fold over an ascending snapshot sequence
//!   ([`downsample`] for a single entity, [`Downsampler`] for a mixed
//!   multi-entity stream)
//!
//! The engine performs no I/O, takes no locks, and is deterministic:
//! identical input sequences always produce identical bucket sequences.
//!
//! # Example
//!
//! ```
//! use chrono::TimeDelta;
//! use tally_engine::{Snapshot, downsample};
//!
//! let snapshots: Vec<Snapshot> = load_history();
//! let buckets = downsample(&snapshots, TimeDelta::hours(24), false);
//! # fn load_history() -> Vec<Snapshot> { Vec::new() }
//! ```

pub mod downsample;
pub mod snapshot;

#[cfg(test)]
mod downsample_test;

// Re-exports
pub use downsample::{Bucket, Downsampler, downsample};
pub use snapshot::{RevenueObservation, Snapshot};
