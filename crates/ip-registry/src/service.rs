//! # Record Manager Service
//!
//! The record lifecycle engine. Every operation follows the same shape:
//!
//! 1. Decode and validate arguments
//! 2. Read the record (at most one key)
//! 3. Check state and, for guarded actions, ask the authorization hook
//! 4. Mutate in memory, append one history entry, check invariants
//! 5. Encode and write once
//! 6. Emit an event (failures are logged, never returned)
//!
//! Nothing is written before step 5, so a failed operation leaves storage
//! untouched.

use crate::config::RegistryConfig;
use crate::domain::codec;
use crate::domain::entities::{NewRecord, Record, RecordState, CONTRACT_CREATOR_KEY};
use crate::domain::invariants::{check_record_invariants, InvariantCheckResult};
use crate::errors::{RegistryError, StoreError};
use crate::events::{
    RecordDeletedPayload, RecordDescriptionUpdatedPayload, RecordRegisteredPayload,
    RecordTransferredPayload, RegistryEvent,
};
use crate::ports::inbound::{InvocationContext, Method, RecordRegistryApi, Response};
use crate::ports::outbound::{Authorizer, GuardedAction};

use parking_lot::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Statistics for the Record Manager.
///
/// Invocation counters are maintained by [`RecordManager::invoke`]; event
/// and authorization counters by every operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Total invocations dispatched.
    pub invocations: u64,
    /// Invocations that returned success.
    pub succeeded: u64,
    /// Invocations that returned an error.
    pub failed: u64,
    /// Events accepted by the sink.
    pub events_emitted: u64,
    /// Events the sink refused.
    pub event_failures: u64,
    /// Guarded actions refused by the authorization hook.
    pub authorization_denials: u64,
}

/// The record lifecycle engine.
///
/// Holds no record state of its own: everything lives in the host store
/// reached through each call's [`InvocationContext`].
pub struct RecordManager {
    /// Service configuration.
    config: RegistryConfig,
    /// Authorization hook for Transfer and Delete.
    authorizer: Box<dyn Authorizer>,
    /// Service statistics.
    stats: RwLock<ServiceStats>,
}

impl RecordManager {
    /// Create a manager with the hook selected by `config.authorization`.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        let authorizer = config.authorization.authorizer();
        Self {
            config,
            authorizer,
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Replace the authorization hook.
    #[must_use]
    pub fn with_authorizer(mut self, authorizer: impl Authorizer + 'static) -> Self {
        self.authorizer = Box::new(authorizer);
        self
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get current service statistics.
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Dispatch a host invocation by method name.
    ///
    /// Unknown names fail with `UnknownMethod`. The result is wrapped in the
    /// host response envelope.
    #[instrument(skip(self, ctx), fields(initiator = %ctx.initiator))]
    pub fn invoke(&self, method: &str, ctx: &InvocationContext<'_>) -> Response {
        let result = method
            .parse::<Method>()
            .and_then(|method| self.call(method, ctx));

        {
            let mut stats = self.stats.write();
            stats.invocations += 1;
            match &result {
                Ok(_) => stats.succeeded += 1,
                Err(_) => stats.failed += 1,
            }
        }

        match &result {
            Ok(body) => debug!(bytes = body.len(), "Invocation succeeded"),
            Err(e) if e.is_client_error() => {
                warn!(kind = ?e.kind(), error = %e, "Invocation rejected");
            }
            Err(e) => error!(kind = ?e.kind(), error = %e, "Invocation failed"),
        }

        Response::from(result)
    }

    // =========================================================================
    // STORAGE HELPERS
    // =========================================================================

    /// Raw bytes of a live-or-deleted record.
    ///
    /// Missing keys, empty values and (unless `strict_reads`) backend errors
    /// all become `NotFound`.
    fn read_raw(&self, ctx: &InvocationContext<'_>, id: &str) -> Result<Vec<u8>, RegistryError> {
        match ctx.store.get_object(id.as_bytes()) {
            Ok(bytes) if !bytes.is_empty() => Ok(bytes),
            Ok(_) | Err(StoreError::NotFound) => Err(RegistryError::NotFound(id.to_string())),
            Err(StoreError::Backend(e)) if self.config.strict_reads => {
                Err(RegistryError::StorageFailure(e))
            }
            Err(StoreError::Backend(e)) => {
                debug!(id, error = %e, "Store read failed, treating record as not found");
                Err(RegistryError::NotFound(id.to_string()))
            }
        }
    }

    fn decode_stored(id: &str, bytes: &[u8]) -> Result<Record, RegistryError> {
        codec::decode(bytes).inspect_err(|e| {
            error!(id, error = %e, "Stored record is undecodable");
        })
    }

    /// The record stored under `id`, if any.
    fn find(&self, ctx: &InvocationContext<'_>, id: &str) -> Result<Option<Record>, RegistryError> {
        match self.read_raw(ctx, id) {
            Ok(bytes) => Self::decode_stored(id, &bytes).map(Some),
            Err(RegistryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The live record under `id`. A tombstoned one fails with `on_deleted`.
    fn load_live(
        &self,
        ctx: &InvocationContext<'_>,
        id: &str,
        on_deleted: impl FnOnce(String) -> RegistryError,
    ) -> Result<Record, RegistryError> {
        let found = self.find(ctx, id)?;
        match (RecordState::of(found.as_ref()), found) {
            (RecordState::Live, Some(record)) => Ok(record),
            (RecordState::Deleted, _) => Err(on_deleted(id.to_string())),
            _ => Err(RegistryError::NotFound(id.to_string())),
        }
    }

    /// Returns true if `id` already holds data.
    fn is_occupied(&self, ctx: &InvocationContext<'_>, id: &str) -> Result<bool, RegistryError> {
        match self.read_raw(ctx, id) {
            Ok(_) => Ok(true),
            Err(RegistryError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn write(&self, ctx: &InvocationContext<'_>, record: &Record) -> Result<(), RegistryError> {
        let bytes = codec::encode(record)?;
        ctx.store
            .put_object(record.id.as_bytes(), &bytes)
            .map_err(|e| {
                error!(id = %record.id, error = %e, "Failed to save record");
                RegistryError::StorageFailure(e.to_string())
            })
    }

    /// Check mutation invariants, then write.
    fn commit(
        &self,
        ctx: &InvocationContext<'_>,
        before: &Record,
        after: &Record,
    ) -> Result<(), RegistryError> {
        if let InvariantCheckResult::Invalid(violations) = check_record_invariants(before, after) {
            let reason = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            error!(id = %after.id, %reason, "Record invariant violated");
            return Err(RegistryError::InvalidState {
                id: after.id.clone(),
                reason: format!("invariant violated ({reason})"),
            });
        }

        if after.history.len() > self.config.history_warn_threshold {
            warn!(
                id = %after.id,
                entries = after.history.len(),
                threshold = self.config.history_warn_threshold,
                "Record history exceeds warning threshold"
            );
        }

        self.write(ctx, after)
    }

    fn contract_creator(&self, ctx: &InvocationContext<'_>) -> Result<Option<String>, RegistryError> {
        match ctx.store.get_object(CONTRACT_CREATOR_KEY) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(StoreError::NotFound) => Ok(None),
            Err(StoreError::Backend(e)) if self.config.strict_reads => {
                Err(RegistryError::StorageFailure(e))
            }
            Err(StoreError::Backend(e)) => {
                debug!(error = %e, "Could not read contract creator");
                Ok(None)
            }
        }
    }

    fn authorize(
        &self,
        ctx: &InvocationContext<'_>,
        action: GuardedAction,
        record: &Record,
    ) -> Result<(), RegistryError> {
        let creator = if self.authorizer.needs_contract_creator() {
            self.contract_creator(ctx)?
        } else {
            None
        };

        if self
            .authorizer
            .authorize(action, &ctx.initiator, record, creator.as_deref())
        {
            return Ok(());
        }

        self.stats.write().authorization_denials += 1;
        Err(RegistryError::Unauthorized {
            caller: ctx.initiator.clone(),
            action: action.as_str().to_string(),
            id: record.id.clone(),
        })
    }

    fn publish(&self, ctx: &InvocationContext<'_>, event: RegistryEvent) {
        let name = event.name();
        match ctx.events.emit(event) {
            Ok(()) => self.stats.write().events_emitted += 1,
            Err(e) => {
                warn!(event = name, error = %e, "Event emission failed");
                self.stats.write().event_failures += 1;
            }
        }
    }
}

/// Validates already-extracted values, reporting the first empty one.
fn require_non_empty(fields: &[(&str, &str)]) -> Result<(), RegistryError> {
    match fields.iter().find(|(_, value)| value.is_empty()) {
        Some((name, _)) => Err(RegistryError::empty(name)),
        None => Ok(()),
    }
}

// =============================================================================
// RecordRegistryApi Implementation
// =============================================================================

impl RecordRegistryApi for RecordManager {
    fn initialize(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError> {
        let creator = ctx.args.non_empty("creator")?;

        if self.config.creator_write_once {
            if let Some(existing) = self.contract_creator(ctx)?.filter(|c| !c.is_empty()) {
                warn!(%existing, "Contract already initialized");
                return Err(RegistryError::InvalidState {
                    id: String::from_utf8_lossy(CONTRACT_CREATOR_KEY).into_owned(),
                    reason: "contract already initialized".to_string(),
                });
            }
        }

        ctx.store
            .put_object(CONTRACT_CREATOR_KEY, creator.as_bytes())
            .map_err(|e| RegistryError::StorageFailure(format!("failed to save creator: {e}")))?;

        info!(%creator, "Contract initialized");
        Ok(format!("Initialized successfully by {creator}").into_bytes())
    }

    fn register(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError> {
        let args = &ctx.args;
        let new = NewRecord {
            id: args.string("id")?,
            title: args.string("title")?,
            creator_name: args.string("creator_name")?,
            holder_address: args.string("holder_address")?,
            category: args.string("category")?,
            description: args.string("description")?,
        };
        require_non_empty(&[
            ("id", &new.id),
            ("title", &new.title),
            ("creator_name", &new.creator_name),
            ("holder_address", &new.holder_address),
            ("category", &new.category),
        ])?;

        if self.is_occupied(ctx, &new.id)? {
            return Err(RegistryError::AlreadyExists(new.id));
        }

        let record = Record::register(new, ctx.timestamp);
        self.write(ctx, &record)?;

        info!(id = %record.id, holder = %record.holder_address, "Record registered");
        self.publish(
            ctx,
            RegistryEvent::RecordRegistered(RecordRegisteredPayload {
                id: record.id.clone(),
                title: record.title.clone(),
                holder_address: record.holder_address.clone(),
            }),
        );

        Ok(format!("Record {} registered successfully", record.id).into_bytes())
    }

    fn query(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError> {
        let id = ctx.args.non_empty("id")?;
        let bytes = self.read_raw(ctx, &id)?;
        let record = Self::decode_stored(&id, &bytes)?;

        if record.state() == RecordState::Deleted {
            return Err(RegistryError::InvalidState {
                id,
                reason: "record has been deleted".to_string(),
            });
        }

        debug!(%id, "Record queried");
        Ok(bytes)
    }

    fn transfer(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError> {
        let id = ctx.args.string("id")?;
        let new_holder = ctx.args.string("new_holder_address")?;
        require_non_empty(&[("id", &id), ("new_holder_address", &new_holder)])?;

        let before = self.load_live(ctx, &id, |id| RegistryError::InvalidState {
            id,
            reason: "cannot transfer deleted record".to_string(),
        })?;
        self.authorize(ctx, GuardedAction::Transfer, &before)?;

        let mut after = before.clone();
        let old_holder = after.transfer(&new_holder, ctx.timestamp);
        self.commit(ctx, &before, &after)?;

        info!(%id, from = %old_holder, to = %new_holder, "Record transferred");
        self.publish(
            ctx,
            RegistryEvent::RecordTransferred(RecordTransferredPayload {
                id: id.clone(),
                old_holder,
                new_holder: new_holder.clone(),
            }),
        );

        Ok(format!("Record {id} transferred to {new_holder}").into_bytes())
    }

    fn update_description(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError> {
        let id = ctx.args.non_empty("id")?;
        // Absent and explicitly empty are the same: both clear the description.
        let new_description = ctx.args.optional("new_description")?.unwrap_or_default();

        let before = self.load_live(ctx, &id, |id| RegistryError::InvalidState {
            id,
            reason: "cannot update description of deleted record".to_string(),
        })?;

        let mut after = before.clone();
        after.update_description(&new_description, ctx.timestamp);
        self.commit(ctx, &before, &after)?;

        info!(%id, "Record description updated");
        self.publish(
            ctx,
            RegistryEvent::RecordDescriptionUpdated(RecordDescriptionUpdatedPayload {
                id: id.clone(),
                new_description,
            }),
        );

        Ok(format!("Description for record {id} updated").into_bytes())
    }

    fn delete(&self, ctx: &InvocationContext<'_>) -> Result<Vec<u8>, RegistryError> {
        let id = ctx.args.non_empty("id")?;

        let before = self.load_live(ctx, &id, RegistryError::AlreadyDeleted)?;
        self.authorize(ctx, GuardedAction::Delete, &before)?;

        let mut after = before.clone();
        after.mark_deleted(&ctx.initiator, ctx.timestamp);
        self.commit(ctx, &before, &after)?;

        info!(%id, by = %ctx.initiator, "Record marked as deleted");
        self.publish(
            ctx,
            RegistryEvent::RecordDeleted(RecordDeletedPayload {
                id: id.clone(),
                deleted_by: ctx.initiator.clone(),
            }),
        );

        Ok(format!("Record {id} marked as deleted").into_bytes())
    }
}

/// Create a manager with default configuration (for testing).
#[must_use]
pub fn create_test_manager() -> RecordManager {
    RecordManager::new(RegistryConfig::default())
}

// =============================================================================
// TESTS
// =============================================================================
