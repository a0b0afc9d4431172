//! Error types for the snapshot store

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur when persisting or loading snapshots
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] turso::Error),

    /// Failed to prepare the storage location on disk
    #[error("failed to prepare storage path '{path}': {source}")]
    Io {
        /// Path that could not be prepared
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A stored row could not be decoded
    #[error("malformed row in {table}: {message}")]
    MalformedRow {
        /// Table the row came from
        table: &'static str,
        /// What was wrong with it
        message: String,
    },
}

impl StoreError {
    /// Create an Io error
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a MalformedRow error
    pub fn malformed_row(table: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedRow {
            table,
            message: message.into(),
        }
    }
}
