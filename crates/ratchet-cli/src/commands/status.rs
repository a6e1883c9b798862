//! Status command implementation

use anyhow::{Context, Result};
use ratchet_core::{RecordedVersion, SchemaVersion, UpgradePlan, UpgradePolicy};
use serde::Serialize;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::load_project;

/// Snapshot of a database relative to the revision set.
#[derive(Debug, Serialize)]
struct StatusReport {
    recorded: Option<SchemaVersion>,
    latest: Option<SchemaVersion>,
    policy: UpgradePolicy,
    pending: Vec<SchemaVersion>,
}

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let revisions = project.revisions()?;
    let table = project.version_table()?;
    if let Some(path) = project.database_path(args.database.as_deref()) {
        if !path.exists() {
            anyhow::bail!("Database {} does not exist", path.display());
        }
    }
    let db = project.open_database(args.database.as_deref())?;

    let recorded = table
        .read(&db)
        .context("Failed to read the recorded schema version")?;
    let policy = project.config.policy;
    let plan = UpgradePlan::new(&revisions, RecordedVersion::from(recorded.clone()), policy)
        .context("Database cannot be upgraded")?;

    let report = StatusReport {
        recorded,
        latest: revisions.latest().map(|r| r.version().clone()),
        policy,
        pending: plan
            .pending()
            .iter()
            .map(|r| r.version().clone())
            .collect(),
    };

    match args.output {
        StatusOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        StatusOutput::Table => print_table(&report),
    }
    Ok(())
}

fn print_table(report: &StatusReport) {
    let or_none = |v: &Option<SchemaVersion>| {
        v.as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string())
    };
    println!("Recorded version: {}", or_none(&report.recorded));
    println!("Latest revision:  {}", or_none(&report.latest));
    println!("Policy:           {}", report.policy);
    if report.pending.is_empty() {
        println!("Up to date");
    } else {
        let versions: Vec<String> = report.pending.iter().map(ToString::to_string).collect();
        println!(
            "Pending:          {} revision(s): {}",
            report.pending.len(),
            versions.join(", ")
        );
    }
}
