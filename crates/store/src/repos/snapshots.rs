//! Snapshot repository
//!
//! Append and query operations for the `stats` table. Rows are immutable
//! once written; queries return ascending timestamp order with equal
//! timestamps in insertion order (`rowid` tie-break), so two snapshots for
//! the same entity at the same instant never reorder.

use chrono::DateTime;
use tally_engine::Snapshot;

use crate::db::StatsDb;
use crate::error::{Result, StoreError};

/// Repository over the `stats` table
pub struct SnapshotRepo<'a> {
    db: &'a StatsDb,
}

impl<'a> SnapshotRepo<'a> {
    /// Create a new snapshot repository
    pub fn new(db: &'a StatsDb) -> Self {
        Self { db }
    }

    /// Append one snapshot
    pub async fn append(&self, snapshot: &Snapshot) -> Result<()> {
        let conn = self.db.connect()?;

        let timestamp = snapshot.timestamp.timestamp_millis().to_string();
        let downloads = snapshot.downloads.to_string();
        let versions = snapshot.versions.to_string();

        // Two statements so an absent follower count lands as a real NULL.
        match snapshot.followers {
            Some(followers) => {
                let followers = followers.to_string();
                conn.execute(
                    r#"
                    INSERT INTO stats (type, project, timestamp, downloads, followers, versions)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    [
                        snapshot.source.as_str(),
                        snapshot.entity.as_str(),
                        timestamp.as_str(),
                        downloads.as_str(),
                        followers.as_str(),
                        versions.as_str(),
                    ],
                )
                .await?;
            }
            None => {
                conn.execute(
                    r#"
                    INSERT INTO stats (type, project, timestamp, downloads, versions)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    [
                        snapshot.source.as_str(),
                        snapshot.entity.as_str(),
                        timestamp.as_str(),
                        downloads.as_str(),
                        versions.as_str(),
                    ],
                )
                .await?;
            }
        }

        Ok(())
    }

    /// All snapshots for one source, ascending by timestamp
    pub async fn for_source(&self, source: &str) -> Result<Vec<Snapshot>> {
        let conn = self.db.connect()?;

        let mut rows = conn
            .query(
                r#"
                SELECT type, project, timestamp, downloads, followers, versions
                FROM stats
                WHERE type = ?1
                ORDER BY timestamp ASC, rowid ASC
                "#,
                [source],
            )
            .await?;

        let mut snapshots = Vec::new();
        while let Some(row) = rows.next().await? {
            snapshots.push(row_to_snapshot(&row)?);
        }

        Ok(snapshots)
    }

    /// All snapshots for one (source, entity) partition, ascending
    pub async fn for_source_entity(&self, source: &str, entity: &str) -> Result<Vec<Snapshot>> {
        let conn = self.db.connect()?;

        let mut rows = conn
            .query(
                r#"
                SELECT type, project, timestamp, downloads, followers, versions
                FROM stats
                WHERE type = ?1 AND project = ?2
                ORDER BY timestamp ASC, rowid ASC
                "#,
                [source, entity],
            )
            .await?;

        let mut snapshots = Vec::new();
        while let Some(row) = rows.next().await? {
            snapshots.push(row_to_snapshot(&row)?);
        }

        Ok(snapshots)
    }
}

fn row_to_snapshot(row: &turso::Row) -> Result<Snapshot> {
    let source = row.get_value(0)?.as_text().cloned().unwrap_or_default();
    let entity = row.get_value(1)?.as_text().cloned().unwrap_or_default();
    let timestamp_ms = *row.get_value(2)?.as_integer().unwrap_or(&0);
    let downloads = *row.get_value(3)?.as_integer().unwrap_or(&0) as u64;
    let followers = row.get_value(4)?.as_integer().map(|f| *f as u64);
    let versions = *row.get_value(5)?.as_integer().unwrap_or(&0) as u64;

    let timestamp = DateTime::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
        StoreError::malformed_row("stats", format!("timestamp {timestamp_ms} out of range"))
    })?;

    Ok(Snapshot {
        source,
        entity,
        timestamp,
        downloads,
        followers,
        versions,
    })
}
