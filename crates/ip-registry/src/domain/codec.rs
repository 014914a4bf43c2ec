//! # Record Codec
//!
//! Named-field JSON encoding of [`Record`]. Field order is irrelevant on
//! decode, so records written by older builds stay readable.

use crate::domain::entities::Record;
use crate::errors::RegistryError;

/// Serializes a record for storage under its id.
pub fn encode(record: &Record) -> Result<Vec<u8>, RegistryError> {
    serde_json::to_vec(record).map_err(|e| RegistryError::CodecFailure(e.to_string()))
}

/// Deserializes stored bytes.
///
/// The bytes were written by this system, so a failure here means storage
/// corruption or a version mismatch and is reported as `CodecFailure`.
pub fn decode(bytes: &[u8]) -> Result<Record, RegistryError> {
    serde_json::from_slice(bytes).map_err(|e| RegistryError::CodecFailure(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewRecord;
    use crate::domain::value_objects::Timestamp;

    fn record() -> Record {
        Record::register(
            NewRecord {
                id: "C1".into(),
                title: "Sunrise".into(),
                creator_name: "Alice".into(),
                holder_address: "addrA".into(),
                category: "image".into(),
                description: String::new(),
            },
            Timestamp::from_unix(1_700_000_000).unwrap(),
        )
    }

    #[test]
    fn test_encoding_uses_field_names() {
        let bytes = encode(&record()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["id"], "C1");
        assert_eq!(value["holder_address"], "addrA");
        assert_eq!(value["deleted"], false);
        assert_eq!(value["history"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_decode_ignores_field_order() {
        let json = br#"{
            "deleted": true,
            "history": ["a", "b"],
            "description": "",
            "category": "text",
            "registered_at": "2024-01-01 00:00:00",
            "holder_address": "h",
            "creator_name": "c",
            "title": "t",
            "id": "X"
        }"#;
        let decoded = decode(json).unwrap();
        assert_eq!(decoded.id, "X");
        assert!(decoded.deleted);
        assert_eq!(decoded.history, vec!["a", "b"]);
    }

    #[test]
    fn test_decode_failure_is_codec_error() {
        assert!(matches!(
            decode(b"not json"),
            Err(RegistryError::CodecFailure(_))
        ));
        // Missing fields are corruption too.
        assert!(matches!(
            decode(br#"{"id":"X"}"#),
            Err(RegistryError::CodecFailure(_))
        ));
    }

    #[test]
    fn test_lossless() {
        let original = record();
        assert_eq!(decode(&encode(&original).unwrap()).unwrap(), original);
    }
}
