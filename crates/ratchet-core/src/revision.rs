//! Revisions and the version-ordered revision set.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::Bound;

use crate::arguments::Arguments;
use crate::error::{CoreError, CoreResult, UpgradeError, UpgradeResult};
use crate::statement::Statement;
use crate::version::{SchemaVersion, VersionPosition};

/// One schema change: the version it produces and the statements that
/// produce it, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    version: SchemaVersion,
    statements: Vec<Statement>,
}

impl Revision {
    /// Create a revision targeting `version`.
    pub fn new(version: impl Into<SchemaVersion>, statements: Vec<Statement>) -> Self {
        Self {
            version: version.into(),
            statements,
        }
    }

    /// The schema version this revision produces once applied.
    pub fn version(&self) -> &SchemaVersion {
        &self.version
    }

    /// Statements in execution order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Resolve each statement against `arguments`, in order.
    ///
    /// The iterator is lazy, so a caller that stops at the first error never
    /// resolves the statements after it.
    pub fn resolved_statements<'a>(
        &'a self,
        arguments: &'a Arguments,
    ) -> impl Iterator<Item = UpgradeResult<Cow<'a, str>>> + 'a {
        self.statements.iter().map(move |statement| {
            statement
                .resolve(arguments)
                .map_err(|missing| UpgradeError::ArgumentMissing {
                    name: missing.0,
                    revision: self.version.clone(),
                })
        })
    }
}

/// The complete catalogue of revisions, keyed and ordered by version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionSet {
    revisions: BTreeMap<SchemaVersion, Revision>,
}

impl RevisionSet {
    /// Build a set from revisions in any order.
    ///
    /// Fails if two revisions target the same version.
    pub fn new(revisions: impl IntoIterator<Item = Revision>) -> CoreResult<Self> {
        let mut map = BTreeMap::new();
        for revision in revisions {
            if map.contains_key(revision.version()) {
                return Err(CoreError::DuplicateRevision {
                    version: revision.version().clone(),
                });
            }
            map.insert(revision.version().clone(), revision);
        }
        Ok(Self { revisions: map })
    }

    /// An empty set: no upgrade work is ever needed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of revisions.
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// Whether the set has no revisions.
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Look up the revision that produces `version`.
    pub fn get(&self, version: &SchemaVersion) -> Option<&Revision> {
        self.revisions.get(version)
    }

    /// Whether some revision produces `version`.
    pub fn contains(&self, version: &SchemaVersion) -> bool {
        self.revisions.contains_key(version)
    }

    /// The revision with the highest version.
    pub fn latest(&self) -> Option<&Revision> {
        self.revisions.values().next_back()
    }

    /// All revisions in ascending version order.
    pub fn iter(&self) -> impl Iterator<Item = &Revision> {
        self.revisions.values()
    }

    /// Revisions whose version is strictly greater than `position`, ascending.
    pub fn pending_after<'a>(
        &'a self,
        position: &VersionPosition,
    ) -> impl Iterator<Item = &'a Revision> + 'a {
        let lower = match position {
            VersionPosition::Initial => Bound::Unbounded,
            VersionPosition::At(version) => Bound::Excluded(version.clone()),
        };
        self.revisions
            .range((lower, Bound::Unbounded))
            .map(|(_, revision)| revision)
    }
}

impl<'a> IntoIterator for &'a RevisionSet {
    type Item = &'a Revision;
    type IntoIter = std::collections::btree_map::Values<'a, SchemaVersion, Revision>;

    fn into_iter(self) -> Self::IntoIter {
        self.revisions.values()
    }
}

#[cfg(test)]
#[path = "revision_test.rs"]
mod tests;
