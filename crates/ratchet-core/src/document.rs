//! Revision document parsing.
//!
//! A revision document is YAML:
//!
//! ```yaml
//! revisions:
//!   - version: 0
//!     statements:
//!       - sql: "CREATE TABLE users (id INTEGER)"
//!       - comment: "readers get SELECT only"
//!       - parameterized: "GRANT SELECT ON users TO ${reader}"
//! ```
//!
//! Each statement entry carries exactly one of `sql`, `parameterized`, or
//! `comment`. Comments are dropped during parsing and never reach the
//! [`RevisionSet`]. Revisions may appear in any order; duplicates are an
//! error.

use serde::Deserialize;
use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::revision::{Revision, RevisionSet};
use crate::statement::Statement;
use crate::version::SchemaVersion;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RevisionDocument {
    #[serde(default)]
    revisions: Vec<RevisionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RevisionEntry {
    version: SchemaVersion,
    #[serde(default)]
    statements: Vec<StatementEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StatementEntry {
    sql: Option<String>,
    parameterized: Option<String>,
    comment: Option<String>,
}

impl StatementEntry {
    /// Convert to a statement, or `None` for a comment.
    fn into_statement(self, version: &SchemaVersion, index: usize) -> CoreResult<Option<Statement>> {
        let invalid = |message: &str| CoreError::InvalidStatement {
            version: version.clone(),
            index,
            message: message.to_string(),
        };

        let statement = match (self.sql, self.parameterized, self.comment) {
            (Some(sql), None, None) => Statement::Literal(sql),
            (None, Some(template), None) => Statement::Parameterized(template),
            (None, None, Some(_)) => return Ok(None),
            (None, None, None) => {
                return Err(invalid("expected one of 'sql', 'parameterized', or 'comment'"))
            }
            _ => {
                return Err(invalid(
                    "only one of 'sql', 'parameterized', or 'comment' may be set",
                ))
            }
        };

        if statement.text().trim().is_empty() {
            return Err(invalid("statement text must not be empty"));
        }
        Ok(Some(statement))
    }
}

/// Parse a revision document held in memory.
///
/// `source_name` only labels error messages.
pub fn parse_document(source_name: &str, content: &str) -> CoreResult<RevisionSet> {
    let document: RevisionDocument =
        serde_yaml::from_str(content).map_err(|e| CoreError::DocumentParseError {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

    let mut revisions = Vec::with_capacity(document.revisions.len());
    for entry in document.revisions {
        let mut statements = Vec::with_capacity(entry.statements.len());
        for (index, statement) in entry.statements.into_iter().enumerate() {
            if let Some(statement) = statement.into_statement(&entry.version, index)? {
                statements.push(statement);
            }
        }
        log::debug!(
            "Parsed revision {} with {} statement(s) from {source_name}",
            entry.version,
            statements.len()
        );
        revisions.push(Revision::new(entry.version, statements));
    }

    RevisionSet::new(revisions)
}

/// Parse a revision document from disk.
pub fn parse_file(path: &Path) -> CoreResult<RevisionSet> {
    if !path.exists() {
        return Err(CoreError::DocumentNotFound {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_document(&path.display().to_string(), &content)
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
