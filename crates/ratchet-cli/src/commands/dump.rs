//! Dump command implementation

use anyhow::{Context, Result};
use ratchet_core::{dump_file, StatementExclusion};
use std::collections::BTreeSet;

use crate::cli::DumpArgs;

/// Execute the dump command
pub(crate) fn execute(args: &DumpArgs) -> Result<()> {
    let exclusions: BTreeSet<StatementExclusion> =
        args.exclusions.iter().copied().map(Into::into).collect();

    let written = dump_file(&args.input, &args.output, &exclusions).with_context(|| {
        format!(
            "Failed to dump {} to {}",
            args.input.display(),
            args.output.display()
        )
    })?;

    println!(
        "Wrote {written} statement(s) to {}",
        args.output.display()
    );
    Ok(())
}
