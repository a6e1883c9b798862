//! Configuration types and parsing for ratchet.yml

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::arguments::Arguments;
use crate::error::{CoreError, CoreResult};
use crate::plan::UpgradePolicy;
use crate::serde_helpers::default_version_table;

/// Project configuration from ratchet.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Revision document, relative to the directory holding the config file
    pub revisions: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Table that records the current schema version
    #[serde(default = "default_version_table")]
    pub version_table: String,

    /// What to do when the database has no recorded version
    #[serde(default)]
    pub policy: UpgradePolicy,

    /// Values for `${name}` placeholders in parameterized statements
    #[serde(default)]
    pub arguments: BTreeMap<String, serde_yaml::Value>,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the DuckDB file, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for ratchet.yml or ratchet.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("ratchet.yml");
        let yaml_path = dir.join("ratchet.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.revisions.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "'revisions' must name a revision document".to_string(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "'database.path' cannot be empty".to_string(),
            });
        }
        if self.version_table.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "'version_table' cannot be empty".to_string(),
            });
        }
        self.arguments()?;
        Ok(())
    }

    /// Absolute path of the revision document, given the config file's directory
    pub fn revisions_path(&self, base_dir: &Path) -> PathBuf {
        let path = Path::new(&self.revisions);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Arguments with every scalar value rendered as text.
    ///
    /// Sequences, mappings, and nulls are rejected.
    pub fn arguments(&self) -> CoreResult<Arguments> {
        let mut arguments = Arguments::new();
        for (name, value) in &self.arguments {
            let text = match value {
                serde_yaml::Value::String(s) => s.clone(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                _ => {
                    return Err(CoreError::ConfigInvalid {
                        message: format!("argument '{name}' must be a string, number, or boolean"),
                    })
                }
            };
            arguments.insert(name.as_str(), text);
        }
        Ok(arguments)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
