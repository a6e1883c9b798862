//! ratchet-core - Core library for Ratchet
//!
//! This crate provides the revision set data model, statement resolution,
//! the revision document parser, the statement dump utility, project
//! configuration, and the upgrade executor that drives a database schema
//! forward one revision at a time.

pub mod arguments;
pub mod config;
pub mod document;
pub mod dump;
pub mod error;
pub mod event;
pub mod executor;
pub mod plan;
pub mod revision;
pub(crate) mod serde_helpers;
pub mod statement;
pub mod version;

pub use arguments::Arguments;
pub use config::Config;
pub use document::{parse_document, parse_file};
pub use dump::{dump_file, dump_statements, StatementExclusion};
pub use error::{BoxError, CoreError, CoreResult, ErrorCode, UpgradeError, UpgradeResult};
pub use event::UpgradeEvent;
pub use executor::{Executor, ExecutorConfig, SchemaConnection};
pub use plan::{UpgradePlan, UpgradePolicy};
pub use revision::{Revision, RevisionSet};
pub use statement::Statement;
pub use version::{RecordedVersion, SchemaVersion, VersionPosition};
