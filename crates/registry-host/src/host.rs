//! # Registry Host
//!
//! Owns the state a deployment environment would provide: the object store,
//! the event bus and the clock. Each protocol line becomes one invocation
//! against a shared [`RecordManager`].

use crate::config::HostConfig;
use crate::protocol::{InvocationRequest, ResponseLine};
use anyhow::{Context, Result};
use chrono::Utc;
use ip_registry::adapters::{InMemoryEventBus, InMemoryObjectStore};
use ip_registry::domain::value_objects::Timestamp;
use ip_registry::events::RegistryEvent;
use ip_registry::ports::inbound::InvocationContext;
use ip_registry::service::{RecordManager, ServiceStats};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// In-process host for the registry.
pub struct Host {
    /// Record lifecycle engine.
    manager: RecordManager,
    /// Host object store.
    store: InMemoryObjectStore,
    /// Host event channel.
    bus: InMemoryEventBus,
}

impl Host {
    /// Create a host with empty storage.
    #[must_use]
    pub fn new(config: &HostConfig) -> Self {
        info!(
            authorization = %config.registry.authorization,
            strict_reads = config.registry.strict_reads,
            creator_write_once = config.registry.creator_write_once,
            event_capacity = config.event_capacity,
            "Creating registry host"
        );
        Self {
            manager: RecordManager::new(config.registry.clone()),
            store: InMemoryObjectStore::new(),
            bus: InMemoryEventBus::with_capacity(config.event_capacity),
        }
    }

    /// Subscribe to every event emitted after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.bus.subscribe()
    }

    /// Current registry statistics.
    #[must_use]
    pub fn stats(&self) -> ServiceStats {
        self.manager.stats()
    }

    /// Host object store.
    #[must_use]
    pub fn store(&self) -> &InMemoryObjectStore {
        &self.store
    }

    /// Handle one protocol line.
    pub fn handle_line(&self, line: &str) -> ResponseLine {
        let span = info_span!("invocation", correlation_id = %Uuid::new_v4());
        let _guard = span.enter();

        let request = match InvocationRequest::parse(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejected protocol line");
                return ResponseLine::bad_request(&e);
            }
        };

        let timestamp = match request.timestamp_or(Timestamp::from(Utc::now())) {
            Ok(timestamp) => timestamp,
            Err(e) => {
                warn!(error = %e, "Rejected protocol line");
                return ResponseLine::bad_request(&e);
            }
        };

        let ctx = InvocationContext::new(
            request.initiator.as_str(),
            timestamp,
            &self.store,
            &self.bus,
        )
        .with_args(request.registry_args());

        ResponseLine::from(self.manager.invoke(&request.method, &ctx))
    }

    /// Answer every non-blank line of `reader` on `writer` until EOF.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut handled = 0u64;

        while let Some(line) = lines.next_line().await.context("Failed to read request")? {
            if line.trim().is_empty() {
                continue;
            }

            let response = self.handle_line(&line);
            let mut encoded =
                serde_json::to_vec(&response).context("Failed to encode response")?;
            encoded.push(b'\n');
            writer
                .write_all(&encoded)
                .await
                .context("Failed to write response")?;
            writer.flush().await.context("Failed to flush response")?;
            handled += 1;
        }

        info!(handled, "Input closed");
        Ok(())
    }
}

/// Log every event published on `receiver` until the bus closes.
pub fn spawn_event_logger(receiver: broadcast::Receiver<RegistryEvent>) -> JoinHandle<u64> {
    tokio::spawn(async move {
        let mut stream = BroadcastStream::new(receiver);
        let mut seen = 0u64;

        while let Some(item) = stream.next().await {
            match item {
                Ok(event) => {
                    seen += 1;
                    match event.payload_json() {
                        Ok(payload) => info!(
                            event = event.name(),
                            id = event.record_id(),
                            %payload,
                            "Registry event"
                        ),
                        Err(e) => warn!(event = event.name(), error = %e, "Unprintable event"),
                    }
                }
                Err(BroadcastStreamRecvError::Lagged(count)) => {
                    warn!(lagged = count, "Event logger lagged, some events dropped");
                }
            }
        }

        debug!(seen, "Event bus closed");
        seen
    })
}

// =============================================================================
// TESTS
// =============================================================================
