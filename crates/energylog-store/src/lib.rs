//! Local data persistence for timestamped energy readings.
//!
//! This crate keeps an append-only log of readings in a SQLite table so
//! they can be shown or uploaded later, and trims the oldest rows once they
//! are safely stored elsewhere.
//!
//! # Features
//!
//! - Append readings, one at a time or in a batch
//! - Read the newest or oldest N readings (60 by default)
//! - Delete the oldest N readings after an upload
//! - Versioned schema with ordered migration steps; without a matching
//!   migration, a version change drops and recreates the table
//!
//! # Example
//!
//! ```no_run
//! use energylog_store::Store;
//! use energylog_types::Reading;
//!
//! let store = Store::open_default()?;
//! store.insert(&Reading::new(12.5, "2017-01-04T10:00:00Z"))?;
//!
//! // Upload the oldest window somewhere, then trim it
//! let oldest = store.earliest()?;
//! store.delete_oldest(oldest.len() as u32)?;
//! # Ok::<(), energylog_store::Error>(())
//! ```

mod error;
mod models;
mod queries;
pub mod schema;
mod store;

pub use error::{Error, Result};
pub use models::StoredReading;
pub use queries::{DeletePolicy, WINDOW_SIZE, WindowQuery};
pub use schema::{Migration, SCHEMA_VERSION, Schema};
pub use store::{Readings, Store};

pub use rusqlite;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/energylog/energy.db`
/// - macOS: `~/Library/Application Support/energylog/energy.db`
/// - Windows: `C:\Users\<user>\AppData\Local\energylog\energy.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("energylog")
        .join("energy.db")
}
