//! Dump the raw SQL of a revision set to a text file.
//!
//! Statements are written in revision order, then statement order, each
//! followed by `;` and a newline. Parameterized statements are written with
//! their placeholders intact. Role and grant statements can be left out for
//! targets where the executing user lacks those privileges.

use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::document::parse_file;
use crate::error::{CoreError, CoreResult};
use crate::revision::RevisionSet;

/// Statement categories that can be excluded from a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatementExclusion {
    /// `CREATE ROLE` and `DROP ROLE`
    Roles,
    /// `GRANT`
    Grants,
}

impl StatementExclusion {
    /// Leading keywords (upper case) that place a statement in this category.
    fn prefixes(self) -> &'static [&'static str] {
        match self {
            StatementExclusion::Roles => &["CREATE ROLE", "DROP ROLE"],
            StatementExclusion::Grants => &["GRANT"],
        }
    }

    /// Whether `sql` belongs to this category.
    pub fn matches(self, sql: &str) -> bool {
        let normalized = sql.trim_start().to_uppercase();
        self.prefixes()
            .iter()
            .any(|prefix| normalized.starts_with(prefix))
    }
}

/// Write every non-excluded statement of `revisions` to `writer`.
///
/// Returns the number of statements written.
pub fn dump_statements<W: Write>(
    revisions: &RevisionSet,
    exclusions: &BTreeSet<StatementExclusion>,
    writer: &mut W,
) -> std::io::Result<usize> {
    let mut written = 0;
    for revision in revisions {
        for statement in revision.statements() {
            let text = statement.text();
            if exclusions.iter().any(|exclusion| exclusion.matches(text)) {
                log::debug!("Excluding statement from revision {}", revision.version());
                continue;
            }
            writer.write_all(text.as_bytes())?;
            writer.write_all(b";\n")?;
            written += 1;
        }
    }
    writer.flush()?;
    Ok(written)
}

/// Parse the revision document at `input` and dump its statements to
/// `output`, creating parent directories and truncating any existing file.
pub fn dump_file(
    input: &Path,
    output: &Path,
    exclusions: &BTreeSet<StatementExclusion>,
) -> CoreResult<usize> {
    let revisions = parse_file(input)?;

    let io_err = |source: std::io::Error| CoreError::IoWithPath {
        path: output.display().to_string(),
        source,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = fs::File::create(output).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let written = dump_statements(&revisions, exclusions, &mut writer).map_err(io_err)?;
    log::info!(
        "Wrote {written} statement(s) from {} to {}",
        input.display(),
        output.display()
    );
    Ok(written)
}

#[cfg(test)]
#[path = "dump_test.rs"]
mod tests;
