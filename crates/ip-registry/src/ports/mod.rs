//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the record registry.
//! These are the interfaces between the domain and the host environment.
//!
//! - **Driving Ports (Inbound)**: `RecordRegistryApi`, `InvocationContext`
//! - **Driven Ports (Outbound)**: `ObjectStore`, `EventSink`, `Authorizer`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
