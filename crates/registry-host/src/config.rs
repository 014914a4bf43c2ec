//! # Host Configuration
//!
//! Registry settings plus host-only knobs, loaded from `IPR_*` environment
//! variables. Unparseable values are logged and ignored so a typo never
//! stops the host from starting.

use ip_registry::adapters::DEFAULT_EVENT_CAPACITY;
use ip_registry::config::RegistryConfig;
use std::str::FromStr;
use tracing::{info, warn};

/// Selects the authorization hook (`permissive` or `owner`).
pub const ENV_AUTHORIZATION: &str = "IPR_AUTHORIZATION";
/// Surface backend read errors instead of treating them as missing records.
pub const ENV_STRICT_READS: &str = "IPR_STRICT_READS";
/// Refuse a second `Initialize`.
pub const ENV_CREATOR_WRITE_ONCE: &str = "IPR_CREATOR_WRITE_ONCE";
/// History length above which a warning is logged.
pub const ENV_HISTORY_WARN_THRESHOLD: &str = "IPR_HISTORY_WARN_THRESHOLD";
/// Log level for the fmt subscriber.
pub const ENV_LOG_LEVEL: &str = "IPR_LOG_LEVEL";
/// Broadcast buffer size of the event bus.
pub const ENV_EVENT_CAPACITY: &str = "IPR_EVENT_CAPACITY";

/// Complete host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Settings passed to the record manager.
    pub registry: RegistryConfig,
    /// Log filter level (`error`, `warn`, `info`, `debug`, `trace`).
    pub log_level: String,
    /// Event bus capacity.
    pub event_capacity: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            log_level: "info".to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Load configuration from the process environment.
#[must_use]
pub fn load_config() -> HostConfig {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration through `lookup`, starting from defaults.
pub fn load_config_from(lookup: impl Fn(&str) -> Option<String>) -> HostConfig {
    let mut config = HostConfig::default();

    if let Some(mode) = parsed(&lookup, ENV_AUTHORIZATION) {
        config.registry.authorization = mode;
        info!(mode = %config.registry.authorization, "Loaded authorization mode from environment");
    }
    if let Some(value) = lookup(ENV_STRICT_READS) {
        match parse_flag(&value) {
            Some(flag) => config.registry.strict_reads = flag,
            None => warn!(key = ENV_STRICT_READS, %value, "Expected a boolean, ignoring"),
        }
    }
    if let Some(value) = lookup(ENV_CREATOR_WRITE_ONCE) {
        match parse_flag(&value) {
            Some(flag) => config.registry.creator_write_once = flag,
            None => warn!(key = ENV_CREATOR_WRITE_ONCE, %value, "Expected a boolean, ignoring"),
        }
    }
    if let Some(threshold) = parsed(&lookup, ENV_HISTORY_WARN_THRESHOLD) {
        config.registry.history_warn_threshold = threshold;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.log_level = level.trim().to_ascii_lowercase();
    }
    if let Some(capacity) = parsed::<usize>(&lookup, ENV_EVENT_CAPACITY) {
        if capacity == 0 {
            warn!(key = ENV_EVENT_CAPACITY, "Capacity must be positive, ignoring");
        } else {
            config.event_capacity = capacity;
        }
    }

    config
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(key, %value, error = %e, "Invalid value in environment, ignoring");
            None
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
