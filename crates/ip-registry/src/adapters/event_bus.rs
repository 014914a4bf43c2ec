//! # Event Bus Adapters
//!
//! `EventSink` implementations.
//!
//! - [`InMemoryEventBus`]: `tokio::sync::broadcast` fan-out for observers
//!   running in the host process
//! - [`RecordingEventSink`]: keeps every event in order for inspection

use crate::errors::EventError;
use crate::events::RegistryEvent;
use crate::ports::outbound::EventSink;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Maximum events buffered per subscriber before the slowest one lags.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

// =============================================================================
// BROADCAST BUS
// =============================================================================

/// In-memory broadcast bus.
///
/// Multi-producer, multi-consumer. Publishing with no subscribers drops the
/// event; that is not an error for a fire-and-forget channel.
pub struct InMemoryEventBus {
    /// Broadcast sender for events.
    sender: broadcast::Sender<RegistryEvent>,

    /// Total events published.
    events_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Create a new bus with the given capacity (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to every subsequent event.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        debug!("New event subscription created");
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total events published, delivered or not.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for InMemoryEventBus {
    fn emit(&self, event: RegistryEvent) -> Result<(), EventError> {
        let name = event.name();

        // Always increment counter (event was attempted)
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(event = name, receivers, "Event published");
            }
            Err(_) => {
                debug!(event = name, "Event dropped (no receivers)");
            }
        }
        Ok(())
    }
}

// =============================================================================
// RECORDING SINK
// =============================================================================

/// Sink that stores events in emission order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<RegistryEvent>>,
}

impl RecordingEventSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event emitted so far.
    #[must_use]
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.lock().clone()
    }

    /// Removes and returns every event emitted so far.
    pub fn drain(&self) -> Vec<RegistryEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of events held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: RegistryEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
