//! # Core Domain Entities
//!
//! The record and its lifecycle. A record is created once, mutated in place
//! while live, and tombstoned on delete. Its bytes are never removed.

use crate::domain::value_objects::Timestamp;
use serde::{Deserialize, Serialize};

// =============================================================================
// WELL-KNOWN KEYS
// =============================================================================

/// Storage key holding the deployment creator written by `Initialize`.
///
/// Records share the same keyspace, so `Register` with id `contract_creator`
/// lands on this key. A later `Initialize` overwrites that record with the
/// plain creator string, and with `creator_write_once` the record's JSON
/// counts as an already stored creator.
pub const CONTRACT_CREATOR_KEY: &[u8] = b"contract_creator";

// =============================================================================
// RECORD
// =============================================================================

/// An intellectual-property registration entry.
///
/// Stored under its `id`. `id`, `creator_name` and `registered_at` never
/// change after registration; `history` only grows; `deleted` never reverts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Primary key.
    pub id: String,
    /// Title of the work.
    pub title: String,
    /// Name of the work's creator.
    pub creator_name: String,
    /// Current rights holder.
    pub holder_address: String,
    /// Registration time, `YYYY-MM-DD HH:MM:SS` UTC.
    pub registered_at: String,
    /// Free-form classification.
    pub category: String,
    /// Mutable description, may be empty.
    pub description: String,
    /// Append-only audit trail.
    pub history: Vec<String>,
    /// Tombstone flag.
    pub deleted: bool,
}

/// Fields supplied by the caller at registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRecord {
    pub id: String,
    pub title: String,
    pub creator_name: String,
    pub holder_address: String,
    pub category: String,
    pub description: String,
}

impl Record {
    /// Registers a new live record with a one-entry history.
    #[must_use]
    pub fn register(new: NewRecord, at: Timestamp) -> Self {
        let registered_at = at.to_string();
        let history = vec![format!(
            "Registered on {registered_at} by {}",
            new.holder_address
        )];
        Self {
            id: new.id,
            title: new.title,
            creator_name: new.creator_name,
            holder_address: new.holder_address,
            registered_at,
            category: new.category,
            description: new.description,
            history,
            deleted: false,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RecordState {
        RecordState::of(Some(self))
    }

    /// Reassigns the holder. Returns the previous holder.
    pub fn transfer(&mut self, new_holder: &str, at: Timestamp) -> String {
        let old = std::mem::replace(&mut self.holder_address, new_holder.to_string());
        self.history
            .push(format!("Transferred from {old} to {new_holder} on {at}"));
        old
    }

    /// Replaces the description. Returns the previous description.
    pub fn update_description(&mut self, new_description: &str, at: Timestamp) -> String {
        let old = std::mem::replace(&mut self.description, new_description.to_string());
        self.history.push(format!(
            "Description updated on {at}. Old: '{old}', New: '{new_description}'"
        ));
        old
    }

    /// Sets the tombstone and records who deleted it.
    pub fn mark_deleted(&mut self, caller: &str, at: Timestamp) {
        self.deleted = true;
        self.history
            .push(format!("Record marked as deleted on {at} by caller {caller}"));
    }
}

// =============================================================================
// LIFECYCLE STATE
// =============================================================================

/// Per-record state machine: `Nonexistent → Live → Deleted`.
///
/// Both transitions are one-way. `Live` loops on transfer and description
/// updates; nothing leaves `Deleted`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordState {
    /// Nothing stored under the key.
    Nonexistent,
    /// Registered and visible.
    Live,
    /// Tombstoned; bytes remain but mutations and queries are refused.
    Deleted,
}

impl RecordState {
    /// State of a key given what a store read found there.
    #[must_use]
    pub fn of(record: Option<&Record>) -> Self {
        match record {
            None => Self::Nonexistent,
            Some(record) if record.deleted => Self::Deleted,
            Some(_) => Self::Live,
        }
    }

    /// Returns true if the lifecycle allows moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: RecordState) -> bool {
        matches!(
            (self, next),
            (Self::Nonexistent, Self::Live) | (Self::Live, Self::Live) | (Self::Live, Self::Deleted)
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewRecord {
        NewRecord {
            id: "C1".into(),
            title: "Sunrise".into(),
            creator_name: "Alice".into(),
            holder_address: "addrA".into(),
            category: "image".into(),
            description: "a painting".into(),
        }
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn test_register_seeds_history() {
        let record = Record::register(sample(), ts("2024-01-02 03:04:05"));

        assert_eq!(record.registered_at, "2024-01-02 03:04:05");
        assert_eq!(
            record.history,
            vec!["Registered on 2024-01-02 03:04:05 by addrA".to_string()]
        );
        assert!(!record.deleted);
        assert_eq!(record.state(), RecordState::Live);
    }

    #[test]
    fn test_transfer_appends_entry() {
        let mut record = Record::register(sample(), ts("2024-01-02 03:04:05"));
        let old = record.transfer("addrB", ts("2024-01-03 00:00:00"));

        assert_eq!(old, "addrA");
        assert_eq!(record.holder_address, "addrB");
        assert_eq!(
            record.history.last().unwrap(),
            "Transferred from addrA to addrB on 2024-01-03 00:00:00"
        );
    }

    #[test]
    fn test_update_description_entry_quotes_values() {
        let mut record = Record::register(sample(), ts("2024-01-02 03:04:05"));
        record.update_description("", ts("2024-01-04 00:00:00"));

        assert_eq!(record.description, "");
        assert_eq!(
            record.history.last().unwrap(),
            "Description updated on 2024-01-04 00:00:00. Old: 'a painting', New: ''"
        );
    }

    #[test]
    fn test_mark_deleted() {
        let mut record = Record::register(sample(), ts("2024-01-02 03:04:05"));
        record.mark_deleted("addrA", ts("2024-01-05 00:00:00"));

        assert_eq!(record.state(), RecordState::Deleted);
        assert_eq!(record.history.len(), 2);
        assert!(record.history[1].contains("by caller addrA"));
    }

    #[test]
    fn test_state_transitions() {
        use RecordState::*;
        assert!(Nonexistent.can_transition_to(Live));
        assert!(Live.can_transition_to(Live));
        assert!(Live.can_transition_to(Deleted));

        assert!(!Nonexistent.can_transition_to(Deleted));
        assert!(!Deleted.can_transition_to(Live));
        assert!(!Deleted.can_transition_to(Deleted));
        assert!(!Live.can_transition_to(Nonexistent));
    }

    #[test]
    fn test_state_of_store_read() {
        let mut record = Record::register(sample(), ts("2024-01-02 03:04:05"));
        assert_eq!(RecordState::of(None), RecordState::Nonexistent);
        assert_eq!(RecordState::of(Some(&record)), RecordState::Live);

        record.mark_deleted("addrA", ts("2024-01-05 00:00:00"));
        assert_eq!(RecordState::of(Some(&record)), RecordState::Deleted);
    }
}
