//! # Registry Host Library
//!
//! This library exposes the host's modules for testing.
//! The main entry point is the `main.rs` binary.
//!
//! - `config` - `IPR_*` environment configuration
//! - `protocol` - JSON-lines request and response types
//! - `host` - store, bus and dispatch loop

#![warn(missing_docs)]

pub mod config;
pub mod host;
pub mod protocol;

pub use config::{load_config, HostConfig};
pub use host::{spawn_event_logger, Host};
pub use protocol::{InvocationRequest, ProtocolError, ResponseLine};
