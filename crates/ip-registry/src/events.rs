//! # Event Schema
//!
//! Structured events emitted after successful mutations. They are a side
//! channel for off-chain observers, not part of the consistency-critical
//! path: a failed emission never fails the operation.
//!
//! ## Wire Shape
//!
//! ```text
//! {"name": "RecordTransferred", "payload": {"id": "C1", "old_holder": "addrA", "new_holder": "addrB"}}
//! ```
//!
//! | Event | Payload keys |
//! |-------|--------------|
//! | `RecordRegistered` | id, title, holder_address |
//! | `RecordTransferred` | id, old_holder, new_holder |
//! | `RecordDescriptionUpdated` | id, new_description |
//! | `RecordDeleted` | id, deleted_by |

use crate::errors::EventError;
use serde::{Deserialize, Serialize};

// =============================================================================
// PAYLOADS
// =============================================================================

/// A new record was registered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRegisteredPayload {
    /// Record id.
    pub id: String,
    /// Title at registration.
    pub title: String,
    /// Initial holder.
    pub holder_address: String,
}

/// A record changed holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTransferredPayload {
    /// Record id.
    pub id: String,
    /// Holder before the transfer.
    pub old_holder: String,
    /// Holder after the transfer.
    pub new_holder: String,
}

/// A record's description was replaced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDescriptionUpdatedPayload {
    /// Record id.
    pub id: String,
    /// The new description (possibly empty).
    pub new_description: String,
}

/// A record was tombstoned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDeletedPayload {
    /// Record id.
    pub id: String,
    /// Caller identity supplied by the host.
    pub deleted_by: String,
}

// =============================================================================
// EVENT ENVELOPE
// =============================================================================

/// Every event the registry emits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "payload")]
pub enum RegistryEvent {
    /// See [`RecordRegisteredPayload`].
    RecordRegistered(RecordRegisteredPayload),
    /// See [`RecordTransferredPayload`].
    RecordTransferred(RecordTransferredPayload),
    /// See [`RecordDescriptionUpdatedPayload`].
    RecordDescriptionUpdated(RecordDescriptionUpdatedPayload),
    /// See [`RecordDeletedPayload`].
    RecordDeleted(RecordDeletedPayload),
}

impl RegistryEvent {
    /// Event name as seen by observers.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RecordRegistered(_) => names::RECORD_REGISTERED,
            Self::RecordTransferred(_) => names::RECORD_TRANSFERRED,
            Self::RecordDescriptionUpdated(_) => names::RECORD_DESCRIPTION_UPDATED,
            Self::RecordDeleted(_) => names::RECORD_DELETED,
        }
    }

    /// Id of the record the event is about.
    #[must_use]
    pub fn record_id(&self) -> &str {
        match self {
            Self::RecordRegistered(p) => &p.id,
            Self::RecordTransferred(p) => &p.id,
            Self::RecordDescriptionUpdated(p) => &p.id,
            Self::RecordDeleted(p) => &p.id,
        }
    }

    /// Payload as a JSON value, without the name wrapper.
    pub fn payload_json(&self) -> Result<serde_json::Value, EventError> {
        let value = match self {
            Self::RecordRegistered(p) => serde_json::to_value(p),
            Self::RecordTransferred(p) => serde_json::to_value(p),
            Self::RecordDescriptionUpdated(p) => serde_json::to_value(p),
            Self::RecordDeleted(p) => serde_json::to_value(p),
        };
        value.map_err(|e| EventError::Serialization(e.to_string()))
    }
}

// =============================================================================
// EVENT NAMES
// =============================================================================

/// Event names emitted by the registry.
pub mod names {
    /// Emitted by `Register`.
    pub const RECORD_REGISTERED: &str = "RecordRegistered";

    /// Emitted by `Transfer`.
    pub const RECORD_TRANSFERRED: &str = "RecordTransferred";

    /// Emitted by `UpdateDescription`.
    pub const RECORD_DESCRIPTION_UPDATED: &str = "RecordDescriptionUpdated";

    /// Emitted by `Delete`.
    pub const RECORD_DELETED: &str = "RecordDeleted";
}

// =============================================================================
// TESTS
// =============================================================================
