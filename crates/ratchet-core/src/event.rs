//! Progress events emitted by the upgrade executor.

use std::fmt;

use crate::version::{SchemaVersion, VersionPosition};

/// A progress notification delivered synchronously to the caller's sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeEvent {
    /// About to execute the statements that move the schema from `from` to `to`.
    Upgrading {
        from: VersionPosition,
        to: SchemaVersion,
    },
    /// About to execute one resolved statement.
    ExecutingSql { sql: String },
}

impl fmt::Display for UpgradeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeEvent::Upgrading { from, to } => write!(f, "Upgrading {from} -> {to}"),
            UpgradeEvent::ExecutingSql { sql } => write!(f, "Executing SQL: {sql}"),
        }
    }
}
