//! # Driving Ports (API - Inbound)
//!
//! The interface the host uses to invoke the registry: an explicit
//! per-call context, the exported methods, and the response envelope.

use crate::domain::value_objects::{Args, Timestamp};
use crate::errors::RegistryError;
use crate::ports::outbound::{EventSink, ObjectStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// INVOCATION CONTEXT
// =============================================================================

/// Everything one invocation may touch, passed explicitly per call.
///
/// There is no global state: the store and event sink are borrowed from the
/// host for the duration of the call.
pub struct InvocationContext<'a> {
    /// Named arguments.
    pub args: Args,
    /// Caller identity furnished by the host.
    pub initiator: String,
    /// Transaction time furnished by the host.
    pub timestamp: Timestamp,
    /// Host object store.
    pub store: &'a dyn ObjectStore,
    /// Host event channel.
    pub events: &'a dyn EventSink,
}

impl<'a> InvocationContext<'a> {
    /// Creates a context with no arguments.
    pub fn new(
        initiator: impl Into<String>,
        timestamp: Timestamp,
        store: &'a dyn ObjectStore,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            args: Args::new(),
            initiator: initiator.into(),
            timestamp,
            store,
            events,
        }
    }

    /// Replaces the argument mapping.
    #[must_use]
    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }
}

impl fmt::Debug for InvocationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("args", &self.args)
            .field("initiator", &self.initiator)
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// METHODS
// =============================================================================

/// Methods exported to the host. Names are matched exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Initialize,
    Register,
    Query,
    Transfer,
    UpdateDescription,
    Delete,
}

impl Method {
    /// All exported methods.
    pub const ALL: [Method; 6] = [
        Self::Initialize,
        Self::Register,
        Self::Query,
        Self::Transfer,
        Self::UpdateDescription,
        Self::Delete,
    ];

    /// Exported name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "Initialize",
            Self::Register => "Register",
            Self::Query => "Query",
            Self::Transfer => "Transfer",
            Self::UpdateDescription => "UpdateDescription",
            Self::Delete => "Delete",
        }
    }
}

impl FromStr for Method {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownMethod(s.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RESPONSE ENVELOPE
// =============================================================================

/// Success status.
pub const STATUS_OK: u16 = 200;

/// Statuses at or above this are failures.
pub const STATUS_ERROR_THRESHOLD: u16 = 400;

/// Failure status for every registry error.
pub const STATUS_ERROR: u16 = 500;

/// Result handed back to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// `200` on success, `500` on failure.
    pub status: u16,
    /// Human-readable outcome.
    pub message: String,
    /// Confirmation bytes, or the encoded record for `Query`.
    pub body: Vec<u8>,
}

impl Response {
    /// Successful response carrying `body`.
    #[must_use]
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            body,
        }
    }

    /// Failed response describing `err`.
    #[must_use]
    pub fn error(err: &RegistryError) -> Self {
        Self {
            status: STATUS_ERROR,
            message: err.to_string(),
            body: Vec::new(),
        }
    }

    /// Returns true for success statuses.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status < STATUS_ERROR_THRESHOLD
    }
}

impl From<Result<Vec<u8>, RegistryError>> for Response {
    fn from(result: Result<Vec<u8>, RegistryError>) -> Self {
        match result {
            Ok(body) => Self::ok(body),
            Err(err) => Self::error(&err),
        }
    }
}

// =============================================================================
// RECORD REGISTRY API (Primary Driving Port)
// =============================================================================

/// Primary API of the record registry.
///
/// Each operation reads at most the record key (plus the creator key for
/// `Initialize` or a strict authorizer) and writes at most once, after all
/// validation.
pub trait RecordRegistryApi: Send + Sync {
    /// Stores the deployment creator. Requires `creator`.
    fn initialize(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError>;

    /// Creates a record. Requires `id, title, creator_name, holder_address,
    /// category, description`.
    fn register(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError>;

    /// Returns the encoded record for `id` unless it is deleted.
    fn query(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError>;

    /// Moves a live record to `new_holder_address`.
    fn transfer(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError>;

    /// Replaces the description; an absent `new_description` clears it.
    fn update_description(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError>;

    /// Tombstones a live record.
    fn delete(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError>;

    /// Routes `method` to the matching operation.
    fn call(&self, method: Method, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError> {
        match method {
            Method::Initialize => self.initialize(ctx),
            Method::Register => self.register(ctx),
            Method::Query => self.query(ctx),
            Method::Transfer => self.transfer(ctx),
            Method::UpdateDescription => self.update_description(ctx),
            Method::Delete => self.delete(ctx),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
