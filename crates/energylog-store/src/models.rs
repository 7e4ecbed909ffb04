//! Data models for stored data.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use energylog_types::Reading;

/// A reading stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReading {
    /// Database row ID.
    pub id: i64,
    /// Energy value.
    pub energy: f64,
    /// Timestamp as it was inserted.
    pub date: String,
}

impl StoredReading {
    /// Map a `SELECT id, energy, date` row.
    ///
    /// SQLite stores a NaN energy as NULL; it is read back as NaN.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            energy: row.get::<_, Option<f64>>(1)?.unwrap_or(f64::NAN),
            date: row.get(2)?,
        })
    }

    /// Convert to a Reading, dropping the row ID.
    pub fn to_reading(&self) -> Reading {
        Reading::new(self.energy, self.date.clone())
    }
}

impl From<StoredReading> for Reading {
    fn from(stored: StoredReading) -> Self {
        Reading::new(stored.energy, stored.date)
    }
}
