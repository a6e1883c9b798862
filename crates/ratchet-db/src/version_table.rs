//! Version table: where the current schema version is recorded.
//!
//! The table is an append-only ledger with one row per recorded version. The
//! current version is the row with the highest `seq`. Versions are stored as
//! decimal text because they have no magnitude limit. A missing or empty
//! table means no version has been recorded yet.
//!
//! Unqualified names live in `main`, never in whatever schema a revision
//! may have switched the connection to.

use crate::duckdb::SchemaDb;
use crate::error::{DbError, DbResult};
use ratchet_core::{BoxError, SchemaVersion};

const DEFAULT_SCHEMA: &str = "main";

/// A (possibly schema-qualified) table recording the schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTable {
    schema: String,
    table: String,
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl VersionTable {
    /// Validate `name` as `table` or `schema.table`. A bare `table` is placed
    /// in the `main` schema.
    pub fn new(name: &str) -> DbResult<Self> {
        let invalid = || DbError::InvalidIdentifier {
            name: name.to_string(),
        };
        let parts: Vec<&str> = name.split('.').collect();
        if !parts.iter().all(|part| is_identifier(part)) {
            return Err(invalid());
        }
        match parts.as_slice() {
            [table] => Ok(Self {
                schema: DEFAULT_SCHEMA.to_string(),
                table: table.to_string(),
            }),
            [schema, table] => Ok(Self {
                schema: schema.to_string(),
                table: table.to_string(),
            }),
            _ => Err(invalid()),
        }
    }

    /// Schema-qualified name as written in SQL.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }

    fn table_error(&self, message: impl Into<String>) -> DbError {
        DbError::VersionTableError {
            table: self.qualified_name(),
            message: message.into(),
        }
    }

    /// Create the schema and the table when missing.
    pub fn ensure(&self, db: &SchemaDb) -> DbResult<()> {
        if self.schema != DEFAULT_SCHEMA {
            db.execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS {}", self.schema))?;
        }
        db.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 seq        BIGINT NOT NULL,
                 version    VARCHAR NOT NULL,
                 applied_at TIMESTAMP NOT NULL DEFAULT now()
             )",
            self.qualified_name()
        ))
    }

    /// Read the most recently recorded version, or `None` if nothing is
    /// recorded.
    pub fn read(&self, db: &SchemaDb) -> DbResult<Option<SchemaVersion>> {
        let name = self.qualified_name();
        if !db.relation_exists(&name)? {
            log::debug!("Version table {name} does not exist");
            return Ok(None);
        }

        let mut stmt = db
            .conn()
            .prepare(&format!("SELECT version FROM {name} ORDER BY seq DESC LIMIT 1"))?;
        let latest = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .next()
            .transpose()?;

        latest
            .map(|value| {
                SchemaVersion::parse(&value).map_err(|e| self.table_error(e.to_string()))
            })
            .transpose()
    }

    /// Record `version` as current.
    ///
    /// Earlier rows are kept. The insert is a single statement, so the
    /// previous version stays readable until the new one is committed.
    pub fn write(&self, version: &SchemaVersion, db: &SchemaDb) -> DbResult<()> {
        self.ensure(db)?;
        let name = self.qualified_name();
        db.conn().execute(
            &format!(
                "INSERT INTO {name} (seq, version)
                 SELECT COALESCE(MAX(seq), 0) + 1, ? FROM {name}"
            ),
            duckdb::params![version.to_string()],
        )?;
        log::debug!("Recorded schema version {version} in {name}");
        Ok(())
    }

    /// Version-get accessor for the upgrade executor.
    pub fn getter(&self) -> impl FnMut(&mut SchemaDb) -> Result<Option<SchemaVersion>, BoxError> + '_ {
        move |db| Ok(self.read(db)?)
    }

    /// Version-set accessor for the upgrade executor.
    pub fn setter(&self) -> impl FnMut(&SchemaVersion, &mut SchemaDb) -> Result<(), BoxError> + '_ {
        move |version, db| Ok(self.write(version, db)?)
    }
}

#[cfg(test)]
#[path = "version_table_test.rs"]
mod tests;
