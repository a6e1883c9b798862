//! Error types for ratchet-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction management error (D003)
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// Version table is unusable (D004)
    #[error("[D004] Version table {table} is invalid: {message}")]
    VersionTableError { table: String, message: String },

    /// Identifier rejected before being spliced into SQL (D005)
    #[error("[D005] Invalid table name '{name}': expected [schema.]table using letters, digits, and underscores")]
    InvalidIdentifier { name: String },
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
