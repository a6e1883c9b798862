//! Upgrade command implementation

use anyhow::{Context, Result};
use ratchet_core::{Executor, ExecutorConfig, UpgradeEvent};

use crate::cli::{GlobalArgs, UpgradeArgs};
use crate::commands::common::load_project;

/// Execute the upgrade command
pub(crate) fn execute(args: &UpgradeArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let revisions = project.revisions()?;
    let table = project.version_table()?;
    let arguments = project.arguments(&args.arguments)?;
    let policy = args
        .policy
        .map(Into::into)
        .unwrap_or(project.config.policy);
    let mut db = project.open_database(args.database.as_deref())?;

    let transactional = !args.no_transaction;
    if transactional {
        db.begin()?;
    }

    let mut applied = 0usize;
    let result = Executor::new(
        ExecutorConfig::new(&mut db, &revisions, policy, table.getter(), table.setter())
            .events(|event| {
                match event {
                    UpgradeEvent::Upgrading { .. } => {
                        applied += 1;
                        println!("  {event}");
                    }
                    UpgradeEvent::ExecutingSql { sql } if global.verbose => {
                        println!("    {sql}");
                    }
                    UpgradeEvent::ExecutingSql { .. } => {}
                }
            })
            .arguments(arguments),
    )
    .execute();

    if let Err(err) = result {
        if transactional {
            if let Err(rollback_err) = db.rollback() {
                log::error!("Rollback after failed upgrade also failed: {rollback_err}");
            }
        }
        return Err(err).context("Upgrade failed");
    }

    if transactional {
        db.commit()?;
    }

    match revisions.latest() {
        Some(latest) if applied > 0 => {
            println!(
                "Applied {applied} revision(s); schema is at version {}",
                latest.version()
            );
        }
        Some(latest) => println!("Schema is up to date at version {}", latest.version()),
        None => println!("No revisions defined; nothing to do"),
    }
    Ok(())
}
