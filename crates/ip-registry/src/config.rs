//! Configuration for the record registry.

use crate::adapters::{OwnerAuthorizer, PermitAll};
use crate::ports::outbound::Authorizer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which authorization hook the registry installs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationMode {
    /// Every caller may transfer and delete.
    #[default]
    Permissive,
    /// Only the holder may transfer; holder or deployment creator may delete.
    Owner,
}

impl AuthorizationMode {
    /// Builds the hook for this mode.
    #[must_use]
    pub fn authorizer(self) -> Box<dyn Authorizer> {
        match self {
            Self::Permissive => Box::new(PermitAll),
            Self::Owner => Box::new(OwnerAuthorizer),
        }
    }
}

impl FromStr for AuthorizationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "owner" => Ok(Self::Owner),
            other => Err(format!("unknown authorization mode: {other}")),
        }
    }
}

impl fmt::Display for AuthorizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permissive => f.write_str("permissive"),
            Self::Owner => f.write_str("owner"),
        }
    }
}

/// Registry configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Authorization hook for Transfer and Delete.
    pub authorization: AuthorizationMode,
    /// Surface backend read errors as `StorageFailure` instead of treating
    /// them as a missing record.
    pub strict_reads: bool,
    /// Refuse a second `Initialize` once a creator is stored.
    pub creator_write_once: bool,
    /// Log a warning when a record's history grows past this many entries.
    pub history_warn_threshold: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            authorization: AuthorizationMode::Permissive,
            strict_reads: false,
            creator_write_once: false,
            history_warn_threshold: 1000,
        }
    }
}
