//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, LedgerEntry, MigrationLedger, LEDGER_TABLE};
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
///
/// The connection is closed when the backend is dropped.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from a source string (handles `:memory:` and a `duckdb://` prefix)
    pub fn new(source: &str) -> DbResult<Self> {
        let path = source.strip_prefix("duckdb://").unwrap_or(source);
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }
}

/// Run `body` between `BEGIN TRANSACTION` and `COMMIT`, rolling back on error.
fn with_transaction<T>(
    conn: &Connection,
    body: impl FnOnce(&Connection) -> DbResult<T>,
) -> DbResult<T> {
    conn.execute_batch("BEGIN TRANSACTION")
        .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

    match body(conn) {
        Ok(value) => {
            if let Err(commit_err) = conn.execute_batch("COMMIT") {
                let _ = conn.execute_batch("ROLLBACK");
                return Err(DbError::TransactionError(format!(
                    "COMMIT failed: {commit_err}"
                )));
            }
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                log::warn!("ROLLBACK failed: {rollback_err}");
            }
            Err(e)
        }
    }
}

impl Database for DuckDbBackend {
    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn execute_in_transaction(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        with_transaction(&conn, |conn| {
            conn.execute_batch(sql)
                .map_err(|e| DbError::ExecutionError(e.to_string()))
        })
    }

    fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;

        // Handle schema-qualified names
        let (schema, table) = match name.rsplit_once('.') {
            Some((schema, table)) => (schema, table),
            None => ("main", name),
        };

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        Ok(count > 0)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

impl MigrationLedger for DuckDbBackend {
    fn ensure_ledger(&self) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {LEDGER_TABLE} (
                 version BIGINT NOT NULL PRIMARY KEY,
                 dirty   BOOLEAN NOT NULL
             );"
        ))
        .map_err(|e| DbError::LedgerError(format!("failed to create {LEDGER_TABLE}: {e}")))
    }

    fn read_version(&self) -> DbResult<Option<LedgerEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("SELECT version, dirty FROM {LEDGER_TABLE} LIMIT 1"))
            .map_err(|e| DbError::LedgerError(format!("failed to read version: {e}")))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| DbError::LedgerError(format!("failed to read version: {e}")))?;

        let Some(row) = rows
            .next()
            .map_err(|e| DbError::LedgerError(format!("failed to read version: {e}")))?
        else {
            return Ok(None);
        };

        let version: i64 = row.get(0)?;
        let dirty: bool = row.get(1)?;
        let version = u64::try_from(version)
            .map_err(|_| DbError::LedgerError(format!("negative version {version} in ledger")))?;
        Ok(Some(LedgerEntry { version, dirty }))
    }

    fn write_version(&self, entry: Option<LedgerEntry>) -> DbResult<()> {
        let conn = self.lock()?;
        with_transaction(&conn, |conn| {
            conn.execute(&format!("DELETE FROM {LEDGER_TABLE}"), [])
                .map_err(|e| DbError::LedgerError(format!("failed to clear ledger: {e}")))?;
            if let Some(entry) = entry {
                let version = i64::try_from(entry.version).map_err(|_| {
                    DbError::LedgerError(format!("version {} out of range", entry.version))
                })?;
                conn.execute(
                    &format!("INSERT INTO {LEDGER_TABLE} (version, dirty) VALUES (?, ?)"),
                    duckdb::params![version, entry.dirty],
                )
                .map_err(|e| DbError::LedgerError(format!("failed to record version: {e}")))?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
