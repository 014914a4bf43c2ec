//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete implementations of the driven ports.
//!
//! - Adapters implement domain ports
//! - The in-memory store and bus stand in for the host environment

pub mod authorizer;
pub mod event_bus;
pub mod object_store;

pub use authorizer::*;
pub use event_bus::*;
pub use object_store::*;
