//! DuckDB connection handle

use crate::error::{DbError, DbResult};
use duckdb::Connection;
use ratchet_core::{BoxError, SchemaConnection};
use std::path::Path;

/// A DuckDB connection that the upgrade executor can run statements on.
///
/// Single-threaded: the executor borrows it mutably for the whole run.
pub struct SchemaDb {
    conn: Connection,
}

impl SchemaDb {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Create an in-memory database.
    pub fn open_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open from a path string (handles the `:memory:` special case).
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::open_memory()
        } else {
            Self::open(Path::new(path))
        }
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute one or more statements with no parameters.
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))
    }

    /// Start a transaction.
    pub fn begin(&self) -> DbResult<()> {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))
    }

    /// Commit the open transaction.
    pub fn commit(&self) -> DbResult<()> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    /// Roll back the open transaction.
    pub fn rollback(&self) -> DbResult<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }

    /// Whether a table or view exists. Unqualified names resolve to `main`.
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = match name.rfind('.') {
            Some(pos) => (&name[..pos], &name[pos + 1..]),
            None => ("main", name),
        };

        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            duckdb::params![schema, table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl SchemaConnection for SchemaDb {
    fn execute_sql(&mut self, sql: &str) -> Result<(), BoxError> {
        self.execute_batch(sql)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
