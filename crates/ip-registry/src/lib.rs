//! # IP Registry - Intellectual-Property Record Registry
//!
//! A registry of intellectual-property records hosted on a shared key-value
//! store. Each record carries an append-only audit history and moves through
//! a one-way lifecycle:
//!
//! ```text
//! Nonexistent --Register--> Live --Delete--> Deleted
//!                            |  ^
//!                            +--+ Transfer, UpdateDescription
//! ```
//!
//! ## Operations
//!
//! | Method | Required arguments | Effect |
//! |--------|--------------------|--------|
//! | `Initialize` | `creator` | Stores the deployment creator |
//! | `Register` | `id, title, creator_name, holder_address, category, description` | Creates a live record |
//! | `Query` | `id` | Returns the stored record unless deleted |
//! | `Transfer` | `id, new_holder_address` | Changes the holder |
//! | `UpdateDescription` | `id` (`new_description` optional) | Replaces the description |
//! | `Delete` | `id` | Tombstones the record |
//!
//! ## Record Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Identity never changes | `domain/invariants.rs` - `check_identity_invariant()` |
//! | History grows by exactly one entry per mutation | `domain/invariants.rs` - `check_history_append_invariant()` |
//! | Tombstones are never cleared | `domain/invariants.rs` - `check_tombstone_invariant()` |
//! | Lifecycle moves forward only | `domain/invariants.rs` - `check_transition_invariant()` |
//!
//! Every failed operation leaves storage untouched and emits no event.
//!
//! ## Host Boundary
//!
//! | Port | Trait | Adapters |
//! |------|-------|----------|
//! | Storage | `ObjectStore` | `InMemoryObjectStore` |
//! | Events | `EventSink` | `InMemoryEventBus`, `RecordingEventSink` |
//! | Authorization | `Authorizer` | `PermitAll`, `OwnerAuthorizer` |
//!
//! ## Usage Example
//!
//! ```
//! use ip_registry::prelude::*;
//!
//! let store = InMemoryObjectStore::new();
//! let events = RecordingEventSink::new();
//! let manager = RecordManager::new(RegistryConfig::default());
//!
//! let now = Timestamp::parse("2024-05-01 12:00:00").unwrap();
//! let ctx = InvocationContext::new("addrA", now, &store, &events).with_args(
//!     Args::new()
//!         .with("id", "C1")
//!         .with("title", "Sunrise")
//!         .with("creator_name", "Alice")
//!         .with("holder_address", "addrA")
//!         .with("category", "image")
//!         .with("description", ""),
//! );
//!
//! let response = manager.invoke("Register", &ctx);
//! assert_eq!(response.status, 200);
//! assert_eq!(events.len(), 1);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{NewRecord, Record, RecordState, CONTRACT_CREATOR_KEY};

    // Value objects
    pub use crate::domain::value_objects::{Args, Timestamp, TIMESTAMP_FORMAT};

    // Invariants
    pub use crate::domain::invariants::{
        check_record_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::{
        InvocationContext, Method, RecordRegistryApi, Response, STATUS_ERROR,
        STATUS_ERROR_THRESHOLD, STATUS_OK,
    };
    pub use crate::ports::outbound::{Authorizer, EventSink, GuardedAction, ObjectStore};

    // Events
    pub use crate::events::{
        RecordDeletedPayload, RecordDescriptionUpdatedPayload, RecordRegisteredPayload,
        RecordTransferredPayload, RegistryEvent,
    };

    // Errors
    pub use crate::errors::{ErrorKind, EventError, RegistryError, StoreError};

    // Adapters
    pub use crate::adapters::{
        InMemoryEventBus, InMemoryObjectStore, OwnerAuthorizer, PermitAll, RecordingEventSink,
    };

    // Configuration
    pub use crate::config::{AuthorizationMode, RegistryConfig};

    // Service
    pub use crate::service::{create_test_manager, RecordManager, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Registry name reported by the host.
pub const CONTRACT_NAME: &str = "ip-registry";

// =============================================================================
// TESTS
// =============================================================================
