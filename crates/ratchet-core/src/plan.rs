//! Upgrade planning: validate the recorded version and select pending work.
//!
//! Planning never touches the database. The executor reads the recorded
//! version, hands it to [`UpgradePlan::new`], then applies whatever the plan
//! says is pending. The `status` command uses the same plan to report on a
//! database without changing it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{UpgradeError, UpgradeResult};
use crate::revision::{Revision, RevisionSet};
use crate::version::{RecordedVersion, SchemaVersion, VersionPosition};

/// What to do when the database has no recorded version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradePolicy {
    /// Treat the database as empty and apply every revision.
    #[default]
    PerformUpgrades,
    /// Refuse to touch a database without a recorded version.
    FailInsteadOfUpgrading,
}

impl fmt::Display for UpgradePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradePolicy::PerformUpgrades => write!(f, "perform_upgrades"),
            UpgradePolicy::FailInsteadOfUpgrading => write!(f, "fail_instead_of_upgrading"),
        }
    }
}

/// The validated starting position and the revisions still to apply.
#[derive(Debug, Clone)]
pub struct UpgradePlan<'a> {
    start: VersionPosition,
    pending: Vec<&'a Revision>,
}

impl<'a> UpgradePlan<'a> {
    /// Validate `recorded` against `revisions` under `policy`.
    ///
    /// The policy gate runs first, so an unset version under
    /// [`UpgradePolicy::FailInsteadOfUpgrading`] fails even when there is
    /// nothing to apply. A known version must be the key of some revision;
    /// versions beyond the set or falling into gaps are both rejected.
    pub fn new(
        revisions: &'a RevisionSet,
        recorded: RecordedVersion,
        policy: UpgradePolicy,
    ) -> UpgradeResult<Self> {
        let start = match recorded {
            RecordedVersion::Unset => match policy {
                UpgradePolicy::FailInsteadOfUpgrading => {
                    log::warn!("No schema version recorded and upgrades are disallowed");
                    return Err(UpgradeError::UpgradeDisallowed);
                }
                UpgradePolicy::PerformUpgrades => VersionPosition::Initial,
            },
            RecordedVersion::Known(version) => {
                if !revisions.contains(&version) {
                    log::warn!("Recorded schema version {version} matches no known revision");
                    return Err(UpgradeError::UnrecognizedSchemaRevision { version });
                }
                VersionPosition::At(version)
            }
        };

        let pending = revisions.pending_after(&start).collect();
        Ok(Self { start, pending })
    }

    /// Position the upgrade starts from.
    pub fn start(&self) -> &VersionPosition {
        &self.start
    }

    /// Revisions to apply, in ascending version order.
    pub fn pending(&self) -> &[&'a Revision] {
        &self.pending
    }

    /// Whether the database is already up to date.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// The version the database will be at once the plan is applied, if any
    /// work is pending.
    pub fn target(&self) -> Option<&SchemaVersion> {
        self.pending.last().map(|revision| revision.version())
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
