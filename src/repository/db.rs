//! Database Connection and Setup
//!
//! Manages the SQLite connection, transactions and migrations.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{DomainError, DomainResult};

pub const MEMORY_PATH: &str = ":memory:";

/// Database state wrapper
///
/// Cloning is cheap; every clone shares the one connection. All access is
/// serialized through the mutex, and writers additionally take SQLite's
/// RESERVED lock up front (`BEGIN IMMEDIATE`).
#[derive(Clone)]
pub struct DbState {
    conn: Arc<Mutex<Option<Connection>>>,
    timeout: Duration,
}

impl DbState {
    pub fn new(conn: Connection, timeout: Duration) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
            timeout,
        }
    }

    async fn lock(&self) -> DomainResult<MutexGuard<'_, Option<Connection>>> {
        tokio::time::timeout(self.timeout, self.conn.lock())
            .await
            .map_err(|_| DomainError::Internal("Timed out waiting for the database".to_string()))
    }

    /// Run `f` against the connection outside any explicit transaction
    pub async fn with_conn<R, F>(&self, f: F) -> DomainResult<R>
    where
        F: FnOnce(&Connection) -> DomainResult<R> + Send,
        R: Send,
    {
        let guard = self.lock().await?;
        let conn = guard
            .as_ref()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;
        f(conn)
    }

    /// Run `f` inside an IMMEDIATE transaction.
    ///
    /// Commits when `f` returns `Ok`; any error drops the transaction, which
    /// rolls back every statement `f` executed.
    pub async fn transaction<R, F>(&self, f: F) -> DomainResult<R>
    where
        F: FnOnce(&Transaction<'_>) -> DomainResult<R> + Send,
        R: Send,
    {
        let mut guard = self.lock().await?;
        let conn = guard
            .as_mut()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let result = f(&tx)?;
        tx.commit().map_err(|e| DomainError::Commit(e.to_string()))?;
        Ok(result)
    }

    /// Take the connection out and close it. Later calls fail with "not initialized".
    pub async fn close(&self) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| DomainError::from(e))?;
            tracing::info!("Database connection closed");
        }
        Ok(())
    }
}

/// Open the database, apply connection pragmas and run migrations
pub async fn init_db(db_path: &Path, timeout: Duration) -> DomainResult<DbState> {
    let conn = Connection::open(db_path)?;

    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(timeout)?;
    if db_path.as_os_str() != MEMORY_PATH {
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        tracing::debug!(journal_mode = %mode, "Journal mode set");
    }

    let applied = run_migrations(&conn)?;
    tracing::info!(path = %db_path.display(), applied, "Database initialized");

    Ok(DbState::new(conn, timeout))
}

/// One forward-only schema change, applied only when its target is missing
enum Step {
    Table { name: &'static str, ddl: &'static str },
    Column { table: &'static str, column: &'static str, ddl: &'static str },
    Index { name: &'static str, ddl: &'static str },
}

const MIGRATIONS: &[Step] = &[
    Step::Table {
        name: "lists",
        ddl: "CREATE TABLE lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT '',
            sort_order INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
    },
    Step::Table {
        name: "sections",
        ddl: "CREATE TABLE sections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            list_id INTEGER NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            sort_order INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
    },
    Step::Table {
        name: "items",
        ddl: "CREATE TABLE items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            section_id INTEGER NOT NULL REFERENCES sections(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            completed INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
    },
    Step::Column {
        table: "items",
        column: "uncertain",
        ddl: "ALTER TABLE items ADD COLUMN uncertain INTEGER NOT NULL DEFAULT 0",
    },
    Step::Table {
        name: "item_history",
        ddl: "CREATE TABLE item_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            section_id INTEGER NOT NULL REFERENCES sections(id) ON DELETE CASCADE,
            usage_count INTEGER NOT NULL DEFAULT 1,
            last_used_at INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            UNIQUE (name, section_id)
        )",
    },
    Step::Column {
        table: "item_history",
        column: "last_used_seq",
        ddl: "ALTER TABLE item_history ADD COLUMN last_used_seq INTEGER NOT NULL DEFAULT 0",
    },
    Step::Column {
        table: "item_history",
        column: "name_folded",
        ddl: "ALTER TABLE item_history ADD COLUMN name_folded TEXT NOT NULL DEFAULT ''",
    },
    Step::Index {
        name: "idx_lists_order",
        ddl: "CREATE INDEX idx_lists_order ON lists(sort_order)",
    },
    Step::Index {
        name: "idx_sections_list",
        ddl: "CREATE INDEX idx_sections_list ON sections(list_id, sort_order)",
    },
    Step::Index {
        name: "idx_items_section",
        ddl: "CREATE INDEX idx_items_section ON items(section_id, sort_order)",
    },
    Step::Index {
        name: "idx_history_section",
        ddl: "CREATE INDEX idx_history_section ON item_history(section_id)",
    },
];

impl Step {
    fn is_applied(&self, conn: &Connection) -> DomainResult<bool> {
        match self {
            Step::Table { name, .. } => schema_object_exists(conn, "table", name),
            Step::Index { name, .. } => schema_object_exists(conn, "index", name),
            Step::Column { table, column, .. } => column_exists(conn, table, column),
        }
    }

    fn ddl(&self) -> &'static str {
        match self {
            Step::Table { ddl, .. } | Step::Column { ddl, .. } | Step::Index { ddl, .. } => *ddl,
        }
    }

    fn describe(&self) -> String {
        match self {
            Step::Table { name, .. } => format!("create table {}", name),
            Step::Column { table, column, .. } => format!("add column {}.{}", table, column),
            Step::Index { name, .. } => format!("create index {}", name),
        }
    }
}

fn schema_object_exists(conn: &Connection, kind: &str, name: &str) -> DomainResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2",
            rusqlite::params![kind, name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Apply every missing step in order; returns how many ran
pub fn run_migrations(conn: &Connection) -> DomainResult<usize> {
    let mut applied = 0;
    for step in MIGRATIONS {
        if step.is_applied(conn)? {
            continue;
        }
        conn.execute_batch(step.ddl())
            .map_err(|e| DomainError::Internal(format!("Migration '{}' failed: {}", step.describe(), e)))?;
        tracing::info!(step = %step.describe(), "Applied migration");
        applied += 1;
    }
    backfill_folded_names(conn)?;
    Ok(applied)
}

/// Rows written before `name_folded` existed get their key here.
/// SQLite's `lower()` only folds ASCII, so the folding happens in Rust.
fn backfill_folded_names(conn: &Connection) -> DomainResult<()> {
    let pending: Vec<(i64, String)> = {
        let mut stmt = conn.prepare("SELECT id, name FROM item_history WHERE name_folded = ''")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<_, _>>()?
    };
    if pending.is_empty() {
        return Ok(());
    }
    let mut update = conn.prepare("UPDATE item_history SET name_folded = ?1 WHERE id = ?2")?;
    for (id, name) in &pending {
        update.execute(rusqlite::params![name.to_lowercase(), id])?;
    }
    tracing::info!(rows = pending.len(), "Backfilled folded history names");
    Ok(())
}
