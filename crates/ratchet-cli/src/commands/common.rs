//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use ratchet_core::{parse_file, Arguments, Config, RevisionSet};
use ratchet_db::{SchemaDb, VersionTable};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// A loaded config together with the directory it was loaded from.
pub(crate) struct Project {
    pub(crate) config: Config,
    pub(crate) root: PathBuf,
}

impl Project {
    /// Revisions parsed from the configured document.
    pub(crate) fn revisions(&self) -> Result<RevisionSet> {
        let path = self.config.revisions_path(&self.root);
        parse_file(&path)
            .with_context(|| format!("Failed to load revisions from {}", path.display()))
    }

    /// The configured version table.
    pub(crate) fn version_table(&self) -> Result<VersionTable> {
        VersionTable::new(&self.config.version_table).context("Invalid 'version_table' in config")
    }

    /// File backing the database, or `None` for an in-memory database.
    ///
    /// A relative `override_path` (from `--database`) resolves against the
    /// working directory; a relative config path resolves against the config
    /// file's directory.
    pub(crate) fn database_path(&self, override_path: Option<&str>) -> Option<PathBuf> {
        let (raw, base) = match override_path {
            Some(path) => (path, None),
            None => (self.config.database.path.as_str(), Some(&self.root)),
        };
        if raw == ":memory:" {
            return None;
        }
        let path = Path::new(raw);
        match base {
            Some(base) if path.is_relative() => Some(base.join(path)),
            _ => Some(path.to_path_buf()),
        }
    }

    /// Open the configured database, or `override_path` when given.
    pub(crate) fn open_database(&self, override_path: Option<&str>) -> Result<SchemaDb> {
        let db = match self.database_path(override_path) {
            None => SchemaDb::open_memory(),
            Some(path) => {
                log::debug!("Opening database {}", path.display());
                SchemaDb::open(&path)
            }
        };
        db.context("Failed to connect to database")
    }

    /// Config arguments overlaid with command-line `NAME=VALUE` pairs.
    pub(crate) fn arguments(&self, overrides: &[(String, String)]) -> Result<Arguments> {
        let base = self
            .config
            .arguments()
            .context("Invalid 'arguments' in config")?;
        let overrides: Arguments = overrides.iter().cloned().collect();
        Ok(base.merged(&overrides))
    }
}

/// Load the config named by `--config`.
///
/// A directory is searched for `ratchet.yml` or `ratchet.yaml`.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let path = Path::new(&global.config);
    let (config, root) = if path.is_dir() {
        (Config::load_from_dir(path), path.to_path_buf())
    } else {
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        (Config::load(path), root)
    };
    let config = config.context("Failed to load project configuration")?;
    Ok(Project { config, root })
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
