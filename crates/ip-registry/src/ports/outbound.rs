//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the registry depends on. The host environment provides:
//! - The key-value object store
//! - The event emission channel
//!
//! plus an authorization hook the deployment may tighten.
//!
//! All ports are synchronous: the host executes get/put atomically inside
//! the enclosing transaction and the core never awaits.

use crate::domain::entities::Record;
use crate::errors::{EventError, StoreError};
use crate::events::RegistryEvent;

// =============================================================================
// OBJECT STORE (Host key-value store)
// =============================================================================

/// Get/put-by-key primitive of the host store.
///
/// Content is stored and returned untouched. Implementations report a
/// missing key as `StoreError::NotFound`.
pub trait ObjectStore: Send + Sync {
    /// Read the bytes stored at `key`.
    fn get_object(&self, key: &[u8]) -> Result<Vec<u8>, StoreError>;

    /// Write `value` at `key`, replacing any previous value.
    fn put_object(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn get_object(&self, key: &[u8]) -> Result<Vec<u8>, StoreError> {
        (**self).get_object(key)
    }

    fn put_object(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        (**self).put_object(key, value)
    }
}

// =============================================================================
// EVENT SINK (Host event channel)
// =============================================================================

/// Fire-and-forget event emission.
///
/// Errors are reported so the caller can log them; they never roll back
/// the operation that produced the event.
pub trait EventSink: Send + Sync {
    /// Emit one event.
    fn emit(&self, event: RegistryEvent) -> Result<(), EventError>;
}

// =============================================================================
// AUTHORIZATION HOOK
// =============================================================================

/// Mutations guarded by the authorization hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuardedAction {
    /// Change of holder.
    Transfer,
    /// Soft delete.
    Delete,
}

impl GuardedAction {
    /// Verb used in error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Delete => "delete",
        }
    }
}

/// Decides whether `caller` may perform a guarded action on a record.
///
/// Consulted after the record is loaded and its state checked, before any
/// mutation.
pub trait Authorizer: Send + Sync {
    /// Returns true if the action is permitted.
    ///
    /// `contract_creator` is only populated when
    /// [`Authorizer::needs_contract_creator`] returns true.
    fn authorize(
        &self,
        action: GuardedAction,
        caller: &str,
        record: &Record,
        contract_creator: Option<&str>,
    ) -> bool;

    /// Whether the engine should read the deployment creator before asking.
    fn needs_contract_creator(&self) -> bool {
        false
    }
}

// =============================================================================
// TESTS
// =============================================================================
