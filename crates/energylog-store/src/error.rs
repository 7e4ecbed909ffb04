//! Error types for energylog-store.

use std::path::PathBuf;

/// Result type for energylog-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in energylog-store.
///
/// SQLite failures are split by what the store was doing when they
/// happened. Nothing here is retried; every error reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The database file could not be opened or configured.
    #[error("Failed to open database {}: {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        source: rusqlite::Error,
    },

    /// An insert, delete or schema change failed.
    #[error("Write failed: {0}")]
    WriteFailed(#[source] rusqlite::Error),

    /// A read failed.
    #[error("Query failed: {0}")]
    QueryFailed(#[source] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Requested schema version is not a valid target.
    #[error("Invalid schema version {0}: versions start at 1")]
    InvalidSchemaVersion(i32),
}
