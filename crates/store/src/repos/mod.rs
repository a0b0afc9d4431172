//! Table repositories
//!
//! One repository struct per append-only table.

mod revenue;
mod snapshots;

pub use revenue::RevenueRepo;
pub use snapshots::SnapshotRepo;
