//! Error types for ratchet-core

use std::fmt;
use thiserror::Error;

use crate::version::SchemaVersion;

/// Boxed error returned by caller-supplied accessors and connections.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while loading configuration and revision documents.
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Revision document not found
    #[error("[E004] Revision document not found: {path}")]
    DocumentNotFound { path: String },

    /// E005: Revision document is not valid YAML or has the wrong shape
    #[error("[E005] Failed to parse revision document {source_name}: {message}")]
    DocumentParseError {
        source_name: String,
        message: String,
    },

    /// E006: A statement entry is malformed
    #[error("[E006] Invalid statement {index} in revision {version}: {message}")]
    InvalidStatement {
        version: SchemaVersion,
        index: usize,
        message: String,
    },

    /// E007: A version string is not a nonnegative decimal integer
    #[error("[E007] Invalid schema version '{value}': expected a nonnegative decimal integer")]
    InvalidVersion { value: String },

    /// E008: Two revisions share a version number
    #[error("[E008] Duplicate revision for version {version}")]
    DuplicateRevision { version: SchemaVersion },

    /// E009: IO error with file path context
    #[error("[E009] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}

/// Stable machine-readable codes for [`UpgradeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// U001
    UpgradeDisallowed,
    /// U002
    UnrecognizedSchemaRevision,
    /// U003
    ArgumentMissing,
    /// U004
    VersionRead,
    /// U005
    VersionWrite,
    /// U006
    SqlExecution,
}

impl ErrorCode {
    /// The code as it appears in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UpgradeDisallowed => "U001",
            ErrorCode::UnrecognizedSchemaRevision => "U002",
            ErrorCode::ArgumentMissing => "U003",
            ErrorCode::VersionRead => "U004",
            ErrorCode::VersionWrite => "U005",
            ErrorCode::SqlExecution => "U006",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upgrade executor errors.
///
/// None of these are retried. The first one raised aborts the run.
#[derive(Error, Debug)]
pub enum UpgradeError {
    /// Database has no recorded version and the policy forbids upgrading (U001)
    #[error("[U001] Upgrade disallowed: the database has no recorded schema version and upgrades are not permitted")]
    UpgradeDisallowed,

    /// Recorded version is not a known revision (U002)
    #[error("[U002] Unrecognized schema revision: the database is at version {version}, which matches no known revision")]
    UnrecognizedSchemaRevision { version: SchemaVersion },

    /// A parameterized statement references an unsupplied argument (U003)
    #[error("[U003] Argument missing: revision {revision} references '{name}', which was not supplied")]
    ArgumentMissing {
        name: String,
        revision: SchemaVersion,
    },

    /// The version-get accessor failed (U004)
    #[error("[U004] Failed to read the current schema version: {source}")]
    VersionRead {
        #[source]
        source: BoxError,
    },

    /// The version-set accessor failed (U005)
    #[error("[U005] Failed to record schema version {version}: {source}")]
    VersionWrite {
        version: SchemaVersion,
        #[source]
        source: BoxError,
    },

    /// A statement failed to execute (U006)
    #[error("[U006] SQL execution failed in revision {revision}, statement {index}: {source}\n  {sql}")]
    SqlExecution {
        revision: SchemaVersion,
        index: usize,
        sql: String,
        #[source]
        source: BoxError,
    },
}

impl UpgradeError {
    /// Stable code identifying the failure kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            UpgradeError::UpgradeDisallowed => ErrorCode::UpgradeDisallowed,
            UpgradeError::UnrecognizedSchemaRevision { .. } => {
                ErrorCode::UnrecognizedSchemaRevision
            }
            UpgradeError::ArgumentMissing { .. } => ErrorCode::ArgumentMissing,
            UpgradeError::VersionRead { .. } => ErrorCode::VersionRead,
            UpgradeError::VersionWrite { .. } => ErrorCode::VersionWrite,
            UpgradeError::SqlExecution { .. } => ErrorCode::SqlExecution,
        }
    }
}

/// Result type alias for UpgradeError
pub type UpgradeResult<T> = Result<T, UpgradeError>;
