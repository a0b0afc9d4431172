//! Database connection and schema management
//!
//! Uses Turso (async SQLite-compatible) for the snapshot history. The
//! schema is two append-only tables: `stats` for counter snapshots and
//! `revenue` for balance observations. Nothing in this crate issues an
//! UPDATE or DELETE.

use std::path::Path;

use tracing::info;
use turso::{Builder, Connection, Database};

use crate::error::{Result, StoreError};
use crate::repos::{RevenueRepo, SnapshotRepo};

/// Snapshot history database
///
/// Handles are cheap to share behind an `Arc`; each operation opens its own
/// connection from the underlying database.
pub struct StatsDb {
    db: Database,
}

impl StatsDb {
    /// Open (or create) a file-based database at `path`
    ///
    /// Creates the parent directory if it does not exist and initializes
    /// the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir.display().to_string(), e))?;
        }

        info!(path = %path.display(), "opening snapshot store");
        let db = Builder::new_local(&path.display().to_string()).build().await?;

        let store = Self { db };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create an in-memory database (for testing)
    pub async fn memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        let store = Self { db };
        store.init_schema().await?;
        Ok(store)
    }

    /// Snapshot repository over this database
    pub fn snapshots(&self) -> SnapshotRepo<'_> {
        SnapshotRepo::new(self)
    }

    /// Revenue repository over this database
    pub fn revenue(&self) -> RevenueRepo<'_> {
        RevenueRepo::new(self)
    }

    /// Open a connection
    pub(crate) fn connect(&self) -> Result<Connection> {
        Ok(self.db.connect()?)
    }

    /// Create tables and indexes if they do not exist
    async fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute(SCHEMA_STATS, ()).await?;
        conn.execute(INDEX_STATS_SOURCE_TIME, ()).await?;

        conn.execute(SCHEMA_REVENUE, ()).await?;
        conn.execute(INDEX_REVENUE_USER_TIME, ()).await?;

        info!("snapshot store schema initialized");
        Ok(())
    }
}

// =============================================================================
// Schema
// =============================================================================

// `type` holds the source name; kept for compatibility with the historical
// table layout.
const SCHEMA_STATS: &str = r#"
CREATE TABLE IF NOT EXISTS stats (
    type TEXT NOT NULL,
    project TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    downloads INTEGER NOT NULL,
    followers INTEGER,
    versions INTEGER NOT NULL
)
"#;

const INDEX_STATS_SOURCE_TIME: &str =
    "CREATE INDEX IF NOT EXISTS idx_stats_type_timestamp ON stats(type, timestamp)";

const SCHEMA_REVENUE: &str = r#"
CREATE TABLE IF NOT EXISTS revenue (
    type TEXT NOT NULL,
    user TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    all_time_balance REAL NOT NULL,
    balance REAL NOT NULL
)
"#;

const INDEX_REVENUE_USER_TIME: &str =
    "CREATE INDEX IF NOT EXISTS idx_revenue_type_user_timestamp ON revenue(type, user, timestamp)";
