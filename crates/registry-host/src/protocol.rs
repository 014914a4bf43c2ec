//! # Wire Protocol
//!
//! One JSON object per line in each direction.
//!
//! ```text
//! stdin:  {"method":"Register","args":{"id":"C1",...},"initiator":"addrA","timestamp":"2024-05-01 12:00:00"}
//! stdout: {"status":200,"message":"","body":"Record C1 registered successfully"}
//! ```
//!
//! `args`, `initiator` and `timestamp` may be omitted; a missing timestamp is
//! filled from the host clock.

use ip_registry::domain::value_objects::{Args, Timestamp};
use ip_registry::ports::inbound::Response;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Status for lines the host could not parse.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Errors raised before an invocation reaches the registry.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Line is not a valid request object.
    #[error("malformed request: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Timestamp does not match `YYYY-MM-DD HH:MM:SS`.
    #[error("invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        /// The rejected value.
        value: String,
        /// Parser error.
        source: chrono::ParseError,
    },
}

/// A single invocation as read from stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Registry method name.
    pub method: String,
    /// Flat argument mapping.
    #[serde(default)]
    pub args: BTreeMap<String, String>,
    /// Caller identity.
    #[serde(default)]
    pub initiator: String,
    /// Transaction timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl InvocationRequest {
    /// Parse one protocol line.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line)?)
    }

    /// Argument mapping in registry form.
    #[must_use]
    pub fn registry_args(&self) -> Args {
        self.args
            .iter()
            .map(|(k, v)| (k.clone(), v.clone().into_bytes()))
            .collect()
    }

    /// Request timestamp, or `now` when none was given.
    pub fn timestamp_or(&self, now: Timestamp) -> Result<Timestamp, ProtocolError> {
        match &self.timestamp {
            None => Ok(now),
            Some(value) => {
                Timestamp::parse(value).map_err(|source| ProtocolError::InvalidTimestamp {
                    value: value.clone(),
                    source,
                })
            }
        }
    }
}

/// A single response as written to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseLine {
    /// `200`, `400` or `500`.
    pub status: u16,
    /// Error message; empty on success.
    pub message: String,
    /// Response body as UTF-8 (lossy).
    pub body: String,
}

impl ResponseLine {
    /// Response for a line that never reached the registry.
    #[must_use]
    pub fn bad_request(err: &ProtocolError) -> Self {
        Self {
            status: STATUS_BAD_REQUEST,
            message: err.to_string(),
            body: String::new(),
        }
    }
}

impl From<Response> for ResponseLine {
    fn from(response: Response) -> Self {
        Self {
            status: response.status,
            message: response.message,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_request() {
        let request = InvocationRequest::parse(r#"{"method":"Query","args":{"id":"C1"}}"#).unwrap();

        assert_eq!(request.method, "Query");
        assert_eq!(request.initiator, "");
        assert!(request.timestamp.is_none());
        assert_eq!(request.registry_args().string("id").unwrap(), "C1");
    }

    #[test]
    fn test_malformed_line() {
        let err = InvocationRequest::parse("not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
        assert_eq!(ResponseLine::bad_request(&err).status, STATUS_BAD_REQUEST);
    }

    #[test]
    fn test_timestamp_defaults_and_parses() {
        let now = Timestamp::from_unix(0).unwrap();
        let mut request = InvocationRequest::parse(r#"{"method":"Query"}"#).unwrap();
        assert_eq!(request.timestamp_or(now).unwrap(), now);

        request.timestamp = Some("2024-05-01 12:00:00".into());
        assert_eq!(
            request.timestamp_or(now).unwrap().to_string(),
            "2024-05-01 12:00:00"
        );

        request.timestamp = Some("yesterday".into());
        assert!(matches!(
            request.timestamp_or(now),
            Err(ProtocolError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_response_body_is_text() {
        let line = ResponseLine::from(Response::ok(b"Record C1 marked as deleted".to_vec()));
        assert_eq!(line.status, 200);
        assert_eq!(line.body, "Record C1 marked as deleted");
    }
}
