//! Database schema and migrations.
//!
//! The store keeps one `entries` table and records the schema version in a
//! single-row `schema_version` table. When a database is opened with a
//! different version than the one recorded, the registered [`Migration`]
//! steps are searched for a chain from the old version to the new one. If
//! there is no such chain the `entries` table is dropped and recreated, so
//! every stored reading is lost. This applies to upgrades and downgrades
//! alike.

use std::collections::{HashMap, VecDeque};

use rusqlite::{Connection, OptionalExtension, Transaction};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 7;

/// Name of the readings table.
pub const TABLE_NAME: &str = "entries";

const CREATE_ENTRIES: &str = "CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    energy REAL,
    date TEXT
)";

const DROP_ENTRIES: &str = "DROP TABLE IF EXISTS entries";

/// One version-to-version schema step.
///
/// `apply` runs inside the transaction that also records the new version.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Version this step upgrades (or downgrades) from.
    pub from: i32,
    /// Version this step leaves the database at.
    pub to: i32,
    /// The transformation itself.
    pub apply: fn(&Transaction<'_>) -> Result<()>,
}

/// Target schema version plus the migration steps known to reach it.
#[derive(Debug, Clone)]
pub struct Schema {
    version: i32,
    migrations: Vec<Migration>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(SCHEMA_VERSION)
    }
}

impl Schema {
    /// A schema at `version` with no migrations registered.
    pub fn new(version: i32) -> Self {
        Self {
            version,
            migrations: Vec::new(),
        }
    }

    /// Register a migration step.
    ///
    /// Registration order does not matter; the shortest chain is used.
    pub fn with_migration(mut self, migration: Migration) -> Self {
        self.migrations.push(migration);
        self
    }

    /// Target version.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Find the shortest chain of steps leading from `from` to the target version.
    ///
    /// Versions are searched breadth-first, so a step registered later can
    /// still complete a chain. Returns `None` when no chain exists.
    fn plan(&self, from: i32) -> Option<Vec<&Migration>> {
        // Version reached -> index of the step that reached it.
        let mut reached: HashMap<i32, Option<usize>> = HashMap::from([(from, None)]);
        let mut queue = VecDeque::from([from]);

        while let Some(version) = queue.pop_front() {
            if version == self.version {
                let mut steps = Vec::new();
                let mut current = version;
                while let Some(Some(index)) = reached.get(&current) {
                    let step = &self.migrations[*index];
                    steps.push(step);
                    current = step.from;
                }
                steps.reverse();
                return Some(steps);
            }

            for (index, step) in self.migrations.iter().enumerate() {
                if step.from == version && !reached.contains_key(&step.to) {
                    reached.insert(step.to, Some(index));
                    queue.push_back(step.to);
                }
            }
        }

        None
    }
}

/// Initialize the database schema.
pub fn initialize(conn: &mut Connection, schema: &Schema) -> Result<()> {
    if schema.version < 1 {
        return Err(Error::InvalidSchemaVersion(schema.version));
    }

    let tx = conn.transaction().map_err(Error::WriteFailed)?;

    match recorded_version(&tx)? {
        None => {
            debug!("Creating schema version {}", schema.version);
            create_schema(&tx)?;
        }
        Some(version) if version == schema.version => {
            create_schema(&tx)?;
        }
        Some(version) => match schema.plan(version) {
            Some(steps) => {
                for step in steps {
                    info!("Migrating schema from {} to {}", step.from, step.to);
                    (step.apply)(&tx)?;
                }
            }
            None => {
                warn!(
                    "Schema version changed from {} to {}, dropping all readings",
                    version, schema.version
                );
                recreate(&tx)?;
            }
        },
    }

    set_schema_version(&tx, schema.version)?;
    tx.commit().map_err(Error::WriteFailed)?;

    Ok(())
}

/// Get the schema version recorded in the database, if any.
pub(crate) fn recorded_version(conn: &Connection) -> Result<Option<i32>> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .map_err(Error::QueryFailed)?;

    if !exists {
        return Ok(None);
    }

    conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .optional()
        .map_err(Error::QueryFailed)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
        [version],
    )
    .map_err(Error::WriteFailed)?;
    Ok(())
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );
        "#,
    )
    .map_err(Error::WriteFailed)?;
    conn.execute(CREATE_ENTRIES, []).map_err(Error::WriteFailed)?;
    Ok(())
}

/// Drop the readings table and create it again, empty.
pub fn recreate(conn: &Connection) -> Result<()> {
    conn.execute(DROP_ENTRIES, []).map_err(Error::WriteFailed)?;
    create_schema(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_entries(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
            .unwrap()
    }

    fn insert_entry(conn: &Connection, date: &str) {
        conn.execute(
            "INSERT INTO entries (energy, date) VALUES (1.0, ?1)",
            [date],
        )
        .unwrap();
    }

    fn add_note_column(tx: &Transaction<'_>) -> Result<()> {
        tx.execute_batch("ALTER TABLE entries ADD COLUMN note TEXT")
            .map_err(Error::WriteFailed)
    }

    fn noop(_: &Transaction<'_>) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_initialize_fresh_database() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn, &Schema::default()).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&TABLE_NAME.to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[test]
    fn test_schema_version_tracking() {
        let mut conn = Connection::open_in_memory().unwrap();

        assert_eq!(recorded_version(&conn).unwrap(), None);

        initialize(&mut conn, &Schema::default()).unwrap();
        assert_eq!(recorded_version(&conn).unwrap(), Some(SCHEMA_VERSION));
    }

    #[test]
    fn test_same_version_keeps_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn, &Schema::default()).unwrap();
        insert_entry(&conn, "2017-01-01");

        initialize(&mut conn, &Schema::default()).unwrap();
        assert_eq!(count_entries(&conn), 1);
    }

    #[test]
    fn test_upgrade_without_migration_drops_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn, &Schema::new(7)).unwrap();
        insert_entry(&conn, "2017-01-01");
        insert_entry(&conn, "2017-01-02");

        initialize(&mut conn, &Schema::new(8)).unwrap();
        assert_eq!(count_entries(&conn), 0);
        assert_eq!(recorded_version(&conn).unwrap(), Some(8));
    }

    #[test]
    fn test_downgrade_without_migration_drops_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn, &Schema::new(7)).unwrap();
        insert_entry(&conn, "2017-01-01");

        initialize(&mut conn, &Schema::new(3)).unwrap();
        assert_eq!(count_entries(&conn), 0);
        assert_eq!(recorded_version(&conn).unwrap(), Some(3));
    }

    #[test]
    fn test_migration_chain_preserves_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn, &Schema::new(7)).unwrap();
        insert_entry(&conn, "2017-01-01");

        let schema = Schema::new(9)
            .with_migration(Migration {
                from: 8,
                to: 9,
                apply: add_note_column,
            })
            .with_migration(Migration {
                from: 7,
                to: 8,
                apply: noop,
            });
        initialize(&mut conn, &schema).unwrap();

        assert_eq!(count_entries(&conn), 1);
        assert_eq!(recorded_version(&conn).unwrap(), Some(9));
        conn.execute("UPDATE entries SET note = 'kept'", []).unwrap();
    }

    #[test]
    fn test_broken_chain_falls_back_to_recreate() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn, &Schema::new(7)).unwrap();
        insert_entry(&conn, "2017-01-01");

        let schema = Schema::new(10).with_migration(Migration {
            from: 7,
            to: 8,
            apply: noop,
        });
        initialize(&mut conn, &schema).unwrap();
        assert_eq!(count_entries(&conn), 0);
    }

    #[test]
    fn test_looping_chain_is_rejected() {
        let schema = Schema::new(10)
            .with_migration(Migration {
                from: 7,
                to: 8,
                apply: noop,
            })
            .with_migration(Migration {
                from: 8,
                to: 7,
                apply: noop,
            });
        assert!(schema.plan(7).is_none());
        assert!(schema.plan(10).unwrap().is_empty());
    }

    #[test]
    fn test_plan_finds_direct_step_after_dead_end() {
        let schema = Schema::new(9)
            .with_migration(Migration {
                from: 7,
                to: 8,
                apply: noop,
            })
            .with_migration(Migration {
                from: 7,
                to: 9,
                apply: noop,
            });

        let steps = schema.plan(7).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!((steps[0].from, steps[0].to), (7, 9));
    }

    #[test]
    fn test_plan_prefers_shortest_chain() {
        let schema = Schema::new(10)
            .with_migration(Migration {
                from: 7,
                to: 8,
                apply: noop,
            })
            .with_migration(Migration {
                from: 8,
                to: 9,
                apply: noop,
            })
            .with_migration(Migration {
                from: 9,
                to: 10,
                apply: noop,
            })
            .with_migration(Migration {
                from: 8,
                to: 10,
                apply: noop,
            });

        let path: Vec<(i32, i32)> = schema
            .plan(7)
            .unwrap()
            .into_iter()
            .map(|m| (m.from, m.to))
            .collect();
        assert_eq!(path, [(7, 8), (8, 10)]);
    }

    #[test]
    fn test_migration_after_dead_end_keeps_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        initialize(&mut conn, &Schema::new(7)).unwrap();
        insert_entry(&conn, "2017-01-01");

        let schema = Schema::new(9)
            .with_migration(Migration {
                from: 7,
                to: 8,
                apply: noop,
            })
            .with_migration(Migration {
                from: 7,
                to: 9,
                apply: add_note_column,
            });
        initialize(&mut conn, &schema).unwrap();

        assert_eq!(count_entries(&conn), 1);
        conn.execute("UPDATE entries SET note = 'kept'", []).unwrap();
    }

    #[test]
    fn test_invalid_version_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        let err = initialize(&mut conn, &Schema::new(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidSchemaVersion(0)));
    }
}
