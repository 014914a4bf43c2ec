//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for the record registry.
//! NO I/O, NO host access.
//!
//! - This is the **inner layer** of the hexagonal architecture.
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).

pub mod codec;
pub mod entities;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use value_objects::*;
