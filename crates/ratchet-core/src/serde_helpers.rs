//! Shared serde helpers used across multiple modules.

use num_bigint::BigUint;
use serde::de::{self, Visitor};
use std::fmt;

use crate::version::SchemaVersion;

/// Accepts a schema version written either as an integer literal or as a
/// decimal string. Strings are the only way to spell versions wider than
/// 128 bits in YAML.
pub(crate) struct SchemaVersionVisitor;

impl Visitor<'_> for SchemaVersionVisitor {
    type Value = SchemaVersion;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a nonnegative integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(SchemaVersion::from(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<Self::Value, E> {
        Ok(SchemaVersion::new(BigUint::from(value)))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        u64::try_from(value)
            .map(SchemaVersion::from)
            .map_err(|_| E::custom(format!("schema version must not be negative: {value}")))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> Result<Self::Value, E> {
        u128::try_from(value)
            .map(|v| SchemaVersion::new(BigUint::from(v)))
            .map_err(|_| E::custom(format!("schema version must not be negative: {value}")))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        SchemaVersion::parse(value).map_err(E::custom)
    }
}

/// Default name of the table that records the schema version.
pub(crate) fn default_version_table() -> String {
    "ratchet_schema_version".to_string()
}
