//! Revenue repository
//!
//! Append and query operations for the `revenue` table. Same ordering
//! contract as the `stats` table: ascending timestamps, insertion order on
//! ties.

use chrono::DateTime;
use tally_engine::RevenueObservation;

use crate::db::StatsDb;
use crate::error::{Result, StoreError};

/// Repository over the `revenue` table
pub struct RevenueRepo<'a> {
    db: &'a StatsDb,
}

impl<'a> RevenueRepo<'a> {
    /// Create a new revenue repository
    pub fn new(db: &'a StatsDb) -> Self {
        Self { db }
    }

    /// Append one balance observation
    pub async fn append(&self, observation: &RevenueObservation) -> Result<()> {
        let conn = self.db.connect()?;

        let timestamp = observation.timestamp.timestamp_millis().to_string();
        let all_time_balance = observation.all_time_balance.to_string();
        let balance = observation.balance.to_string();

        conn.execute(
            r#"
            INSERT INTO revenue (type, user, timestamp, all_time_balance, balance)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            [
                observation.source.as_str(),
                observation.user.as_str(),
                timestamp.as_str(),
                all_time_balance.as_str(),
                balance.as_str(),
            ],
        )
        .await?;

        Ok(())
    }

    /// All balance observations for one user on one source, ascending
    pub async fn for_user(&self, user: &str, source: &str) -> Result<Vec<RevenueObservation>> {
        let conn = self.db.connect()?;

        let mut rows = conn
            .query(
                r#"
                SELECT type, user, timestamp, all_time_balance, balance
                FROM revenue
                WHERE type = ?1 AND user = ?2
                ORDER BY timestamp ASC, rowid ASC
                "#,
                [source, user],
            )
            .await?;

        let mut observations = Vec::new();
        while let Some(row) = rows.next().await? {
            observations.push(row_to_observation(&row)?);
        }

        Ok(observations)
    }
}

fn row_to_observation(row: &turso::Row) -> Result<RevenueObservation> {
    let source = row.get_value(0)?.as_text().cloned().unwrap_or_default();
    let user = row.get_value(1)?.as_text().cloned().unwrap_or_default();
    let timestamp_ms = *row.get_value(2)?.as_integer().unwrap_or(&0);
    let all_time_balance = *row.get_value(3)?.as_real().unwrap_or(&0.0);
    let balance = *row.get_value(4)?.as_real().unwrap_or(&0.0);

    let timestamp = DateTime::from_timestamp_millis(timestamp_ms).ok_or_else(|| {
        StoreError::malformed_row("revenue", format!("timestamp {timestamp_ms} out of range"))
    })?;

    Ok(RevenueObservation {
        source,
        user,
        timestamp,
        all_time_balance,
        balance,
    })
}
