//! # Error Types
//!
//! All error types for record lifecycle operations and the ports they use.

use thiserror::Error;

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Errors that terminate a single registry operation.
///
/// Every variant surfaces to the caller as the operation's failure result.
/// None of them are retried internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A required key is absent from the argument mapping.
    #[error("missing {0} argument")]
    MissingArgument(String),

    /// A key is present but its value is empty or unusable.
    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    /// No record stored at the key (or the read failed; the two are not distinguished).
    #[error("record {0} not found")]
    NotFound(String),

    /// A record already occupies the key.
    #[error("record {0} already exists")]
    AlreadyExists(String),

    /// The record was already soft-deleted.
    #[error("record {0} is already deleted")]
    AlreadyDeleted(String),

    /// The operation is not allowed in the record's current state.
    #[error("{reason}: {id}")]
    InvalidState { id: String, reason: String },

    /// The authorization hook refused the caller.
    #[error("permission denied: {caller} may not {action} record {id}")]
    Unauthorized {
        caller: String,
        action: String,
        id: String,
    },

    /// Encoding or decoding a stored record failed.
    #[error("codec failure: {0}")]
    CodecFailure(String),

    /// Writing to (or, with strict reads, reading from) the object store failed.
    #[error("storage failure: {0}")]
    StorageFailure(String),

    /// The host asked for a method this contract does not export.
    #[error("unknown method: {0}")]
    UnknownMethod(String),
}

/// Stable tag for a [`RegistryError`] variant, used in logs and stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingArgument,
    InvalidArgument,
    NotFound,
    AlreadyExists,
    AlreadyDeleted,
    InvalidState,
    Unauthorized,
    CodecFailure,
    StorageFailure,
    UnknownMethod,
}

impl RegistryError {
    /// Returns the variant tag.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingArgument(_) => ErrorKind::MissingArgument,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::AlreadyDeleted(_) => ErrorKind::AlreadyDeleted,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::CodecFailure(_) => ErrorKind::CodecFailure,
            Self::StorageFailure(_) => ErrorKind::StorageFailure,
            Self::UnknownMethod(_) => ErrorKind::UnknownMethod,
        }
    }

    /// Returns true if the caller caused this error (bad input or wrong state).
    ///
    /// Codec and storage failures are internal and return false.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::CodecFailure(_) | Self::StorageFailure(_))
    }

    /// Shorthand for an empty-value argument error.
    pub(crate) fn empty(name: &str) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            reason: "cannot be empty".to_string(),
        }
    }
}

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors from the host object store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Nothing stored under the key.
    #[error("key not found")]
    NotFound,

    /// The backend failed (I/O, poisoned lock, rejected write).
    #[error("store backend error: {0}")]
    Backend(String),
}

// =============================================================================
// EVENT ERRORS
// =============================================================================

/// Errors from the event emission channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The payload could not be serialized.
    #[error("event serialization error: {0}")]
    Serialization(String),

    /// The sink refused or lost the event.
    #[error("event sink error: {0}")]
    Sink(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::MissingArgument("id".to_string());
        assert_eq!(err.to_string(), "missing id argument");

        let err = RegistryError::InvalidState {
            id: "C1".to_string(),
            reason: "cannot transfer deleted record".to_string(),
        };
        assert_eq!(err.to_string(), "cannot transfer deleted record: C1");

        let err = RegistryError::AlreadyExists("C1".to_string());
        assert_eq!(err.to_string(), "record C1 already exists");
    }

    #[test]
    fn test_client_vs_internal() {
        assert!(RegistryError::NotFound("x".into()).is_client_error());
        assert!(RegistryError::empty("title").is_client_error());
        assert!(!RegistryError::StorageFailure("disk".into()).is_client_error());
        assert!(!RegistryError::CodecFailure("eof".into()).is_client_error());
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            RegistryError::AlreadyDeleted("x".into()).kind(),
            ErrorKind::AlreadyDeleted
        );
        assert_eq!(
            RegistryError::UnknownMethod("Foo".into()).kind(),
            ErrorKind::UnknownMethod
        );
    }

    #[test]
    fn test_store_error_display() {
        assert_eq!(StoreError::NotFound.to_string(), "key not found");
        assert!(StoreError::Backend("io".into()).to_string().contains("io"));
    }
}
