//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use ratchet_core::{StatementExclusion, UpgradePolicy};
use std::path::PathBuf;

/// Ratchet - forward-only schema upgrades for DuckDB
#[derive(Parser, Debug)]
#[command(name = "ratchet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (prints each statement and debug logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the project config file
    #[arg(short, long, global = true, default_value = "ratchet.yml")]
    pub config: String,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending revisions to the database
    Upgrade(UpgradeArgs),

    /// Show the recorded version and pending revisions
    Status(StatusArgs),

    /// Write the raw SQL of a revision document to a file
    Dump(DumpArgs),
}

/// Arguments for the upgrade command
#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// Override the database path from the config (relative to the working directory)
    #[arg(short, long)]
    pub database: Option<String>,

    /// Override the upgrade policy from the config
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Argument for parameterized statements (repeatable)
    #[arg(short = 'a', long = "arg", value_name = "NAME=VALUE", value_parser = parse_argument)]
    pub arguments: Vec<(String, String)>,

    /// Run without wrapping the upgrade in a transaction
    #[arg(long)]
    pub no_transaction: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Override the database path from the config (relative to the working directory)
    #[arg(short, long)]
    pub database: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable summary
    Table,
    /// JSON output
    Json,
}

/// Arguments for the dump command
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Revision document to read
    pub input: PathBuf,

    /// SQL file to write (parent directories are created)
    pub output: PathBuf,

    /// Statement categories to leave out
    #[arg(value_enum, ignore_case = true)]
    pub exclusions: Vec<ExclusionArg>,
}

/// Upgrade policy as spelled on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    /// Apply every revision to an uninitialized database
    PerformUpgrades,
    /// Refuse to touch an uninitialized database
    FailInsteadOfUpgrading,
}

impl From<PolicyArg> for UpgradePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::PerformUpgrades => UpgradePolicy::PerformUpgrades,
            PolicyArg::FailInsteadOfUpgrading => UpgradePolicy::FailInsteadOfUpgrading,
        }
    }
}

/// Statement category excluded from a dump
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionArg {
    /// CREATE ROLE and DROP ROLE statements
    Roles,
    /// GRANT statements
    Grants,
}

impl From<ExclusionArg> for StatementExclusion {
    fn from(arg: ExclusionArg) -> Self {
        match arg {
            ExclusionArg::Roles => StatementExclusion::Roles,
            ExclusionArg::Grants => StatementExclusion::Grants,
        }
    }
}

/// Parse `NAME=VALUE`. The value may itself contain `=`.
fn parse_argument(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
