//! ratchet-db - DuckDB support for Ratchet
//!
//! This crate provides [`SchemaDb`], a DuckDB connection usable as the
//! executor's connection handle, and [`VersionTable`], which stores the
//! current schema version and supplies the executor's version accessors.

pub mod duckdb;
pub mod error;
pub mod version_table;

pub use crate::duckdb::SchemaDb;
pub use error::{DbError, DbResult};
pub use version_table::VersionTable;
