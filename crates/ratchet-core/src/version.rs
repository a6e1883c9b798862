//! Schema version numbers.
//!
//! Three types cover the three places a version shows up:
//!
//! - [`SchemaVersion`] is a real, nonnegative, arbitrary-precision version.
//!   Every revision in a [`crate::RevisionSet`] is keyed by one.
//! - [`RecordedVersion`] is what the database reports: either nothing has
//!   been recorded yet, or a concrete version.
//! - [`VersionPosition`] is where the executor currently stands. The
//!   `Initial` position is the `-1` sentinel that precedes every revision.

use num_bigint::{BigInt, BigUint};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A nonnegative schema version with no magnitude limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaVersion(BigUint);

impl SchemaVersion {
    /// Wrap an existing big integer.
    pub fn new(value: BigUint) -> Self {
        Self(value)
    }

    /// Borrow the underlying integer.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Parse a decimal string containing only ASCII digits.
    ///
    /// Signs, whitespace, and other radixes are rejected so that the textual
    /// form stored in a version table is unambiguous.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidVersion {
            value: text.to_string(),
        };
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        BigUint::from_str(text).map(Self).map_err(|_| invalid())
    }
}

impl From<u64> for SchemaVersion {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u32> for SchemaVersion {
    fn from(value: u32) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for SchemaVersion {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl FromStr for SchemaVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for SchemaVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for SchemaVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(crate::serde_helpers::SchemaVersionVisitor)
    }
}

/// The version a database reports through the version-get accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedVersion {
    /// No version has been recorded (uninitialized database).
    Unset,
    /// A concrete version is recorded.
    Known(SchemaVersion),
}

impl From<Option<SchemaVersion>> for RecordedVersion {
    fn from(value: Option<SchemaVersion>) -> Self {
        match value {
            Some(version) => RecordedVersion::Known(version),
            None => RecordedVersion::Unset,
        }
    }
}

impl fmt::Display for RecordedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordedVersion::Unset => write!(f, "unset"),
            RecordedVersion::Known(version) => write!(f, "{version}"),
        }
    }
}

/// Where the schema stands during an upgrade.
///
/// `Initial` sorts before every `At` position, and displays as `-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VersionPosition {
    /// Before the first revision: the `-1` sentinel.
    Initial,
    /// At a concrete schema version.
    At(SchemaVersion),
}

impl VersionPosition {
    /// Signed integer form of the position (`-1` for `Initial`).
    pub fn to_signed(&self) -> BigInt {
        match self {
            VersionPosition::Initial => BigInt::from(-1),
            VersionPosition::At(version) => BigInt::from(version.as_biguint().clone()),
        }
    }
}

impl From<SchemaVersion> for VersionPosition {
    fn from(value: SchemaVersion) -> Self {
        VersionPosition::At(value)
    }
}

impl fmt::Display for VersionPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionPosition::Initial => write!(f, "-1"),
            VersionPosition::At(version) => write!(f, "{version}"),
        }
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
