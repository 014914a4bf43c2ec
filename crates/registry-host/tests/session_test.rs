//! # Host Session Tests
//!
//! Scripted stdin sessions against a host built from environment-style
//! configuration.

use registry_host::config::{load_config_from, ENV_AUTHORIZATION, ENV_CREATOR_WRITE_ONCE};
use registry_host::{Host, ResponseLine};

// =============================================================================
// TEST HELPERS
// =============================================================================

fn host_with(pairs: &'static [(&'static str, &'static str)]) -> Host {
    let config = load_config_from(|key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    });
    Host::new(&config)
}

async fn run(host: &Host, lines: &[&str]) -> Vec<ResponseLine> {
    let input = lines.join("\n");
    let mut output = Vec::new();
    host.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

const INIT_ADMIN: &str = r#"{"method":"Initialize","initiator":"deployer","args":{"creator":"admin"}}"#;
const REGISTER_C1: &str = r#"{"method":"Register","initiator":"addrA","args":{"id":"C1","title":"Sunrise","creator_name":"Alice","holder_address":"addrA","category":"image","description":"a painting"}}"#;

// =============================================================================
// SESSIONS
// =============================================================================

#[tokio::test]
async fn test_permissive_session() {
    let host = host_with(&[]);
    let responses = run(
        &host,
        &[
            INIT_ADMIN,
            REGISTER_C1,
            REGISTER_C1,
            r#"{"method":"Transfer","initiator":"stranger","args":{"id":"C1","new_holder_address":"addrB"}}"#,
            r#"{"method":"Query","args":{"id":"C1"}}"#,
        ],
    )
    .await;

    assert_eq!(responses[0].body, "Initialized successfully by admin");
    assert_eq!(responses[1].status, 200);
    assert_eq!(responses[2].message, "record C1 already exists");
    assert_eq!(responses[3].body, "Record C1 transferred to addrB");

    let record: serde_json::Value = serde_json::from_str(&responses[4].body).unwrap();
    assert_eq!(record["holder_address"], "addrB");
}

#[tokio::test]
async fn test_owner_session() {
    let host = host_with(&[(ENV_AUTHORIZATION, "owner"), (ENV_CREATOR_WRITE_ONCE, "true")]);
    let responses = run(
        &host,
        &[
            INIT_ADMIN,
            r#"{"method":"Initialize","initiator":"mallory","args":{"creator":"mallory"}}"#,
            REGISTER_C1,
            r#"{"method":"Transfer","initiator":"mallory","args":{"id":"C1","new_holder_address":"mallory"}}"#,
            r#"{"method":"Delete","initiator":"mallory","args":{"id":"C1"}}"#,
            r#"{"method":"Delete","initiator":"admin","args":{"id":"C1"}}"#,
            r#"{"method":"Query","args":{"id":"C1"}}"#,
        ],
    )
    .await;

    let statuses: Vec<u16> = responses.iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![200, 500, 200, 500, 500, 200, 500]);
    assert!(responses[3].message.starts_with("permission denied"));
    assert_eq!(responses[6].message, "record has been deleted: C1");

    let stats = host.stats();
    assert_eq!(stats.authorization_denials, 2);
    assert_eq!(stats.invocations, 7);
}
