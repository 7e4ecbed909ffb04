//! Query builders for reading windows and deletion policy.
//!
//! A window is a size-bounded, time-ordered slice of the `entries` table.
//! [`WindowQuery`] follows the builder pattern used throughout the store.
//!
//! # Example
//!
//! ```
//! use energylog_store::{Store, WindowQuery};
//!
//! let store = Store::open_in_memory()?;
//!
//! // The ten oldest readings, oldest first
//! let query = WindowQuery::new().oldest_first().limit(10);
//! let readings = store.query_window(&query)?;
//! assert!(readings.is_empty());
//! # Ok::<(), energylog_store::Error>(())
//! ```

use serde::{Deserialize, Serialize};

/// Default window size for [`Store::latest`](crate::Store::latest) and
/// [`Store::earliest`](crate::Store::earliest).
pub const WINDOW_SIZE: u32 = 60;

/// Fluent query builder for reading windows.
///
/// By default a query returns the newest [`WINDOW_SIZE`] readings, newest
/// first. Rows are ordered by `date`, with ties broken by insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowQuery {
    /// Maximum number of results.
    pub limit: u32,
    /// Order by date descending (newest first).
    pub newest_first: bool,
}

impl Default for WindowQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowQuery {
    /// Create a query for the newest [`WINDOW_SIZE`] readings.
    pub fn new() -> Self {
        Self {
            limit: WINDOW_SIZE,
            newest_first: true,
        }
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Order results by newest first (the default).
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Order results by oldest first (ascending by `date`).
    pub fn oldest_first(mut self) -> Self {
        self.newest_first = false;
        self
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let order = if self.newest_first { "DESC" } else { "ASC" };
        format!(
            "SELECT id, energy, date FROM entries ORDER BY date {order}, id {order} LIMIT {}",
            self.limit
        )
    }
}

/// How [`Store::delete_oldest_with`](crate::Store::delete_oldest_with)
/// addresses the rows it removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Delete the selected rows by row ID. Exactly `min(n, count)` rows go.
    #[default]
    RowId,
    /// Delete every row whose timestamp matches one of the selected rows.
    ///
    /// Rows sharing a timestamp are removed as a group, so this can delete
    /// more than `n` rows when timestamps repeat.
    Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_query_defaults() {
        let query = WindowQuery::new();
        assert_eq!(query.limit, WINDOW_SIZE);
        assert!(query.newest_first);
        assert_eq!(query, WindowQuery::default());
    }

    #[test]
    fn test_window_query_builder() {
        let query = WindowQuery::new().oldest_first().limit(5);
        assert_eq!(query.limit, 5);
        assert!(!query.newest_first);

        let query = query.newest_first();
        assert!(query.newest_first);
    }

    #[test]
    fn test_build_sql_newest_first() {
        let sql = WindowQuery::new().limit(3).build_sql();
        assert_eq!(
            sql,
            "SELECT id, energy, date FROM entries ORDER BY date DESC, id DESC LIMIT 3"
        );
    }

    #[test]
    fn test_build_sql_oldest_first() {
        let sql = WindowQuery::new().oldest_first().build_sql();
        assert!(sql.contains("ORDER BY date ASC, id ASC"));
        assert!(sql.ends_with("LIMIT 60"));
    }

    #[test]
    fn test_delete_policy_serde_names() {
        assert_eq!(
            serde_json::to_string(&DeletePolicy::RowId).unwrap(),
            "\"row_id\""
        );
        let policy: DeletePolicy = serde_json::from_str("\"timestamp\"").unwrap();
        assert_eq!(policy, DeletePolicy::Timestamp);
        assert_eq!(DeletePolicy::default(), DeletePolicy::RowId);
    }
}
