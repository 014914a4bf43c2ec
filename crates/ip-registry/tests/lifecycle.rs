//! # Record Lifecycle Tests
//!
//! Drives the registry through the public dispatch surface the way a host
//! would: method name, argument mapping, caller identity, clock.
//!
//! ## Test Categories
//!
//! 1. **End-to-end flow** - Register, Transfer, Delete on one record
//! 2. **Failure isolation** - Failed calls never touch storage or events
//! 3. **Observers** - Broadcast subscribers see events in commit order

use ip_registry::prelude::*;
use tracing_subscriber::EnvFilter;

// =============================================================================
// TEST HELPERS
// =============================================================================

/// Route registry logs through the test writer so rejected and failed
/// invocations are formatted (visible with `--nocapture`).
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("ip_registry=debug"))
        .with_test_writer()
        .try_init();
}

struct Harness {
    manager: RecordManager,
    store: InMemoryObjectStore,
    events: RecordingEventSink,
    clock: i64,
}

impl Harness {
    fn new(config: RegistryConfig) -> Self {
        init_tracing();
        Self {
            manager: RecordManager::new(config),
            store: InMemoryObjectStore::new(),
            events: RecordingEventSink::new(),
            clock: 1_714_564_800, // 2024-05-01 12:00:00 UTC
        }
    }

    fn call(&mut self, method: &str, caller: &str, args: Args) -> Response {
        self.clock += 60;
        let now = Timestamp::from_unix(self.clock).unwrap();
        let ctx = InvocationContext::new(caller, now, &self.store, &self.events).with_args(args);
        self.manager.invoke(method, &ctx)
    }

    fn query(&mut self, id: &str) -> Result<Record, String> {
        let response = self.call("Query", "reader", Args::new().with("id", id));
        if response.is_ok() {
            Ok(serde_json::from_slice(&response.body).unwrap())
        } else {
            Err(response.message)
        }
    }

    fn snapshot(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.store
            .keys()
            .unwrap()
            .into_iter()
            .map(|k| {
                let v = self.store.get_object(&k).unwrap();
                (k, v)
            })
            .collect()
    }
}

fn sunrise(id: &str) -> Args {
    Args::new()
        .with("id", id)
        .with("title", "Sunrise")
        .with("creator_name", "Alice")
        .with("holder_address", "addrA")
        .with("category", "image")
        .with("description", "a painting")
}

// =============================================================================
// END-TO-END FLOW
// =============================================================================

#[test]
fn test_register_transfer_delete_flow() {
    let mut h = Harness::new(RegistryConfig::default());

    assert!(h.call("Register", "addrA", sunrise("C1")).is_ok());

    let record = h.query("C1").unwrap();
    assert!(!record.deleted);
    assert_eq!(record.holder_address, "addrA");
    assert_eq!(record.history.len(), 1);

    let transfer = Args::new().with("id", "C1").with("new_holder_address", "addrB");
    assert!(h.call("Transfer", "addrA", transfer).is_ok());

    let record = h.query("C1").unwrap();
    assert_eq!(record.holder_address, "addrB");
    assert_eq!(record.history.len(), 2);
    assert!(record.history[1].contains("addrA"));
    assert!(record.history[1].contains("addrB"));

    assert!(h.call("Delete", "addrB", Args::new().with("id", "C1")).is_ok());

    let err = h.query("C1").unwrap_err();
    assert!(err.contains("deleted"), "unexpected message: {err}");

    // Tombstoned bytes stay readable through the store.
    let raw = h.store.get_object(b"C1").unwrap();
    let stored: Record = serde_json::from_slice(&raw).unwrap();
    assert!(stored.deleted);
    assert_eq!(stored.history.len(), 3);

    let names: Vec<_> = h.events.events().iter().map(RegistryEvent::name).collect();
    assert_eq!(names, vec!["RecordRegistered", "RecordTransferred", "RecordDeleted"]);
}

#[test]
fn test_registered_fields_round_trip() {
    let mut h = Harness::new(RegistryConfig::default());
    h.call("Register", "addrA", sunrise("C1"));

    let record = h.query("C1").unwrap();
    assert_eq!(record.id, "C1");
    assert_eq!(record.title, "Sunrise");
    assert_eq!(record.creator_name, "Alice");
    assert_eq!(record.category, "image");
    assert_eq!(record.description, "a painting");
    assert_eq!(record.registered_at, "2024-05-01 12:01:00");
    assert_eq!(record.state(), RecordState::Live);
}

#[test]
fn test_update_description_without_value_clears() {
    let mut h = Harness::new(RegistryConfig::default());
    h.call("Register", "addrA", sunrise("C1").with("description", "A"));

    let response = h.call("UpdateDescription", "addrA", Args::new().with("id", "C1"));
    assert!(response.is_ok());
    assert_eq!(h.query("C1").unwrap().description, "");
}

#[test]
fn test_history_timestamps_follow_clock() {
    let mut h = Harness::new(RegistryConfig::default());
    h.call("Register", "addrA", sunrise("C1"));
    h.call(
        "UpdateDescription",
        "addrA",
        Args::new().with("id", "C1").with("new_description", "b"),
    );

    let record = h.query("C1").unwrap();
    assert_eq!(
        record.history,
        vec![
            "Registered on 2024-05-01 12:01:00 by addrA".to_string(),
            "Description updated on 2024-05-01 12:02:00. Old: 'a painting', New: 'b'".to_string(),
        ]
    );
}

// =============================================================================
// FAILURE ISOLATION
// =============================================================================

#[test]
fn test_failed_calls_leave_no_trace() {
    let mut h = Harness::new(RegistryConfig::default());
    h.call("Register", "addrA", sunrise("C1"));
    h.call("Delete", "addrA", Args::new().with("id", "C2"));
    let snapshot = h.snapshot();
    let emitted = h.events.len();

    let failures = [
        ("Register", sunrise("C1")),
        ("Register", Args::new().with("id", "C3")),
        ("Transfer", Args::new().with("id", "C2").with("new_holder_address", "x")),
        ("Transfer", Args::new().with("id", "C1")),
        ("UpdateDescription", Args::new()),
        ("UpdateDescription", Args::new().with("id", "C9")),
        ("Delete", Args::new().with("id", "")),
        ("Query", Args::new().with("id", "C9")),
        ("Mint", Args::new().with("id", "C1")),
    ];

    for (method, args) in failures {
        let response = h.call(method, "addrA", args);
        assert_eq!(response.status, STATUS_ERROR, "{method} should fail");
        assert!(response.body.is_empty());
    }

    assert_eq!(h.snapshot(), snapshot);
    assert_eq!(h.events.len(), emitted);
}

#[test]
fn test_deleted_record_is_frozen() {
    let mut h = Harness::new(RegistryConfig::default());
    h.call("Register", "addrA", sunrise("C1"));
    h.call("Delete", "addrA", Args::new().with("id", "C1"));
    let snapshot = h.snapshot();

    let transfer = h.call(
        "Transfer",
        "addrA",
        Args::new().with("id", "C1").with("new_holder_address", "addrB"),
    );
    assert_eq!(transfer.message, "cannot transfer deleted record: C1");

    let update = h.call("UpdateDescription", "addrA", Args::new().with("id", "C1"));
    assert!(!update.is_ok());

    for _ in 0..2 {
        let delete = h.call("Delete", "addrA", Args::new().with("id", "C1"));
        assert_eq!(delete.message, "record C1 is already deleted");
    }

    assert_eq!(h.snapshot(), snapshot);
}

#[test]
fn test_owner_mode_end_to_end() {
    let mut h = Harness::new(RegistryConfig {
        authorization: AuthorizationMode::Owner,
        ..RegistryConfig::default()
    });
    h.call("Initialize", "deployer", Args::new().with("creator", "admin"));
    h.call("Register", "addrA", sunrise("C1"));

    let theft = h.call(
        "Transfer",
        "mallory",
        Args::new().with("id", "C1").with("new_holder_address", "mallory"),
    );
    assert!(!theft.is_ok());
    assert!(theft.message.starts_with("permission denied"));
    assert_eq!(h.query("C1").unwrap().holder_address, "addrA");

    assert!(h.call("Delete", "admin", Args::new().with("id", "C1")).is_ok());

    let stats = h.manager.stats();
    assert_eq!(stats.authorization_denials, 1);
}

// =============================================================================
// OBSERVERS
// =============================================================================

#[tokio::test]
async fn test_broadcast_subscriber_sees_commit_order() {
    init_tracing();
    let manager = RecordManager::new(RegistryConfig::default());
    let store = InMemoryObjectStore::new();
    let bus = InMemoryEventBus::new();
    let mut rx = bus.subscribe();
    let now = Timestamp::parse("2024-05-01 12:00:00").unwrap();

    let calls = [
        ("Register", sunrise("C1")),
        (
            "Transfer",
            Args::new().with("id", "C1").with("new_holder_address", "addrB"),
        ),
        (
            "UpdateDescription",
            Args::new().with("id", "C1").with("new_description", "new"),
        ),
        ("Delete", Args::new().with("id", "C1")),
    ];
    for (method, args) in calls {
        let ctx = InvocationContext::new("addrA", now, &store, &bus).with_args(args);
        assert!(manager.invoke(method, &ctx).is_ok());
    }

    let mut names = Vec::new();
    for _ in 0..4 {
        names.push(rx.recv().await.unwrap().name());
    }
    assert_eq!(
        names,
        vec![
            "RecordRegistered",
            "RecordTransferred",
            "RecordDescriptionUpdated",
            "RecordDeleted"
        ]
    );
    assert_eq!(bus.events_published(), 4);
}
