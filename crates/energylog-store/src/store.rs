//! Main store implementation.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, MappedRows, Row, Transaction, TransactionBehavior};
use tracing::{debug, info};

use energylog_types::Reading;

use crate::error::{Error, Result};
use crate::models::StoredReading;
use crate::queries::{DeletePolicy, WINDOW_SIZE, WindowQuery};
use crate::schema::{self, Schema};

type RowMapper = fn(&Row<'_>) -> rusqlite::Result<StoredReading>;

/// SQLite-based store for energy readings.
///
/// A store owns its connection. Open it once, hand it to whoever needs it,
/// and [`close`](Store::close) it (or drop it) when done.
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open or create a database at the given path with the default schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &Schema::default())
    }

    /// Open or create a database at the given path, bringing it to `schema`.
    pub fn open_with<P: AsRef<Path>>(path: P, schema: &Schema) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let open_failed = |source| Error::OpenFailed {
            path: path.to_path_buf(),
            source,
        };
        let mut conn = Connection::open(path).map_err(open_failed)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(open_failed)?;

        schema::initialize(&mut conn, schema)?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with(&Schema::default())
    }

    /// Open an in-memory database with a specific schema.
    pub fn open_in_memory_with(schema: &Schema) -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(|source| Error::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        schema::initialize(&mut conn, schema)?;
        Ok(Self { conn, path: None })
    }

    /// Close the database, reporting any error SQLite raises while doing so.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| Error::WriteFailed(e))?;
        debug!("Database closed");
        Ok(())
    }

    /// Path of the database file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> Result<i32> {
        Ok(schema::recorded_version(&self.conn)?.unwrap_or(0))
    }
}

// Write operations
impl Store {
    /// Append a reading. Returns the new row ID.
    pub fn insert(&self, reading: &Reading) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO entries (energy, date) VALUES (?1, ?2)",
                rusqlite::params![reading.energy, reading.date],
            )
            .map_err(Error::WriteFailed)?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Append several readings in one transaction.
    pub fn insert_many(&self, readings: &[Reading]) -> Result<usize> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(Error::WriteFailed)?;

        {
            let mut stmt = tx
                .prepare_cached("INSERT INTO entries (energy, date) VALUES (?1, ?2)")
                .map_err(Error::WriteFailed)?;
            for reading in readings {
                stmt.execute(rusqlite::params![reading.energy, reading.date])
                    .map_err(Error::WriteFailed)?;
            }
        }

        tx.commit().map_err(Error::WriteFailed)?;
        debug!("Inserted {} readings", readings.len());
        Ok(readings.len())
    }

    /// Delete the `n` oldest readings by row ID.
    ///
    /// Meant to be called once those rows are safely stored elsewhere.
    /// Returns the number of rows removed.
    pub fn delete_oldest(&self, n: u32) -> Result<usize> {
        self.delete_oldest_with(n, DeletePolicy::default())
    }

    /// Delete the `n` oldest readings using the given policy.
    ///
    /// The oldest rows are those with the smallest `date`, ties broken by
    /// insertion order. With [`DeletePolicy::Timestamp`] every row sharing a
    /// timestamp with one of them is removed too.
    pub fn delete_oldest_with(&self, n: u32, policy: DeletePolicy) -> Result<usize> {
        if n == 0 {
            return Ok(0);
        }

        // Take the write lock before choosing rows, so no other connection
        // can change them between the read and the delete.
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(Error::WriteFailed)?;

        let oldest = self.query_window(&WindowQuery::new().oldest_first().limit(n))?;

        let mut removed = 0;
        {
            let sql = match policy {
                DeletePolicy::RowId => "DELETE FROM entries WHERE id = ?1",
                DeletePolicy::Timestamp => "DELETE FROM entries WHERE date = ?1",
            };
            let mut stmt = tx.prepare_cached(sql).map_err(Error::WriteFailed)?;

            for row in &oldest {
                debug!("Deleting reading {} dated {}", row.id, row.date);
                removed += match policy {
                    DeletePolicy::RowId => stmt.execute([row.id]),
                    DeletePolicy::Timestamp => stmt.execute([&row.date]),
                }
                .map_err(Error::WriteFailed)?;
            }
        }

        tx.commit().map_err(Error::WriteFailed)?;
        info!("Deleted {} oldest readings ({:?})", removed, policy);
        Ok(removed)
    }
}

// Read operations
impl Store {
    /// Run `f` over a lazily-read window of readings.
    ///
    /// The underlying statement lives only for the duration of the call and
    /// is finalized on every exit path, including early returns from `f`.
    pub fn with_window<T, F>(&self, query: &WindowQuery, f: F) -> Result<T>
    where
        F: FnOnce(Readings<'_>) -> T,
    {
        let sql = query.build_sql();
        debug!("Executing query: {}", sql);

        let mut stmt = self.conn.prepare(&sql).map_err(Error::QueryFailed)?;
        let rows = stmt
            .query_map([], StoredReading::from_row as RowMapper)
            .map_err(Error::QueryFailed)?;

        let out = f(Readings { rows });
        Ok(out)
    }

    /// Collect a window of readings.
    pub fn query_window(&self, query: &WindowQuery) -> Result<Vec<StoredReading>> {
        self.with_window(query, |rows| rows.collect::<Result<Vec<_>>>())?
    }

    /// Up to `limit` readings, newest first.
    pub fn latest_window(&self, limit: u32) -> Result<Vec<StoredReading>> {
        self.query_window(&WindowQuery::new().newest_first().limit(limit))
    }

    /// Up to `limit` readings, oldest first.
    pub fn earliest_window(&self, limit: u32) -> Result<Vec<StoredReading>> {
        self.query_window(&WindowQuery::new().oldest_first().limit(limit))
    }

    /// The newest [`WINDOW_SIZE`] readings.
    pub fn latest(&self) -> Result<Vec<StoredReading>> {
        self.latest_window(WINDOW_SIZE)
    }

    /// The oldest [`WINDOW_SIZE`] readings.
    pub fn earliest(&self) -> Result<Vec<StoredReading>> {
        self.earliest_window(WINDOW_SIZE)
    }

    /// Count stored readings.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .map_err(Error::QueryFailed)?;

        Ok(count as u64)
    }
}

/// Single-pass iterator over a window, handed out by [`Store::with_window`].
pub struct Readings<'stmt> {
    rows: MappedRows<'stmt, RowMapper>,
}

impl Iterator for Readings<'_> {
    type Item = Result<StoredReading>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|row| row.map_err(Error::QueryFailed))
    }
}
