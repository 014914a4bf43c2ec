//! # Value Objects
//!
//! Immutable domain primitives for the record registry.
//! These types are defined by their value, not identity.

use crate::errors::RegistryError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// TIMESTAMP
// =============================================================================

/// Layout used for every timestamp written into a record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Transaction time supplied by the host, always in UTC.
///
/// The core never reads a local clock; every replica formats the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Builds a timestamp from unix seconds. Returns None if out of range.
    #[must_use]
    pub fn from_unix(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Parses `YYYY-MM-DD HH:MM:SS` as UTC.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let naive = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)?;
        Ok(Self(naive.and_utc()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

// =============================================================================
// ARGUMENT MAPPING
// =============================================================================

/// Flat argument mapping handed over by the host (name → opaque bytes).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args(HashMap<String, Vec<u8>>);

impl Args {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an argument.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Adds or replaces an argument in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.0.insert(name.into(), value.into());
    }

    /// Raw bytes for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes `name` as UTF-8. Fails with `MissingArgument` if the key is absent.
    ///
    /// The value may be empty.
    pub fn string(&self, name: &str) -> Result<String, RegistryError> {
        let bytes = self
            .get(name)
            .ok_or_else(|| RegistryError::MissingArgument(name.to_string()))?;
        decode_utf8(name, bytes)
    }

    /// Like [`Args::string`] but also rejects the empty string.
    pub fn non_empty(&self, name: &str) -> Result<String, RegistryError> {
        let value = self.string(name)?;
        if value.is_empty() {
            return Err(RegistryError::empty(name));
        }
        Ok(value)
    }

    /// Decodes `name` if present. Absent keys yield `Ok(None)`.
    pub fn optional(&self, name: &str) -> Result<Option<String>, RegistryError> {
        self.get(name).map(|bytes| decode_utf8(name, bytes)).transpose()
    }
}

impl<K, V> FromIterator<(K, V)> for Args
where
    K: Into<String>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, Vec<u8>>> for Args {
    fn from(map: HashMap<String, Vec<u8>>) -> Self {
        Self(map)
    }
}

fn decode_utf8(name: &str, bytes: &[u8]) -> Result<String, RegistryError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| RegistryError::InvalidArgument {
        name: name.to_string(),
        reason: "not valid UTF-8".to_string(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
