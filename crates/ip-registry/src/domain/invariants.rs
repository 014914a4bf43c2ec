//! # Domain Invariants
//!
//! Checks that MUST hold across every record mutation before it is written.
//!
//! - Identity fields (`id`, `creator_name`, `registered_at`) never change
//! - History grows by exactly one entry and earlier entries are untouched
//! - A tombstone is never cleared
//! - The lifecycle only moves along `Nonexistent → Live → Deleted`

use crate::domain::entities::{Record, RecordState};

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Identity fields are immutable after registration.
#[must_use]
pub fn check_identity_invariant(before: &Record, after: &Record) -> bool {
    before.id == after.id
        && before.creator_name == after.creator_name
        && before.registered_at == after.registered_at
}

/// Each mutation appends exactly one entry and keeps the prefix intact.
#[must_use]
pub fn check_history_append_invariant(before: &Record, after: &Record) -> bool {
    after.history.len() == before.history.len() + 1
        && after.history.starts_with(&before.history)
}

/// `deleted` never goes from true back to false.
#[must_use]
pub fn check_tombstone_invariant(before: &Record, after: &Record) -> bool {
    !before.deleted || after.deleted
}

/// The state change is an allowed lifecycle edge.
#[must_use]
pub fn check_transition_invariant(before: &Record, after: &Record) -> bool {
    before.state().can_transition_to(after.state())
}

/// Check all mutation invariants at once.
#[must_use]
pub fn check_record_invariants(before: &Record, after: &Record) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_identity_invariant(before, after) {
        violations.push(InvariantViolation::IdentityChanged);
    }

    if !check_history_append_invariant(before, after) {
        violations.push(InvariantViolation::HistoryNotAppended {
            before: before.history.len(),
            after: after.history.len(),
        });
    }

    if !check_tombstone_invariant(before, after) {
        violations.push(InvariantViolation::TombstoneCleared);
    }

    if !check_transition_invariant(before, after) {
        violations.push(InvariantViolation::IllegalTransition {
            from: before.state(),
            to: after.state(),
        });
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT RESULT TYPES
// =============================================================================

/// Result of invariant checking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the violations (empty if valid).
    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        match self {
            Self::Valid => &[],
            Self::Invalid(v) => v,
        }
    }
}

/// A specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// `id`, `creator_name` or `registered_at` changed.
    IdentityChanged,
    /// History did not grow by exactly one entry, or was rewritten.
    HistoryNotAppended { before: usize, after: usize },
    /// A deleted record was revived.
    TombstoneCleared,
    /// Lifecycle edge not in the state machine.
    IllegalTransition { from: RecordState, to: RecordState },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdentityChanged => write!(f, "identity fields changed"),
            Self::HistoryNotAppended { before, after } => {
                write!(f, "history must grow by one entry: {before} -> {after}")
            }
            Self::TombstoneCleared => write!(f, "deleted flag cleared"),
            Self::IllegalTransition { from, to } => {
                write!(f, "illegal transition {from:?} -> {to:?}")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewRecord;
    use crate::domain::value_objects::Timestamp;

    fn live() -> Record {
        Record::register(
            NewRecord {
                id: "C1".into(),
                title: "Sunrise".into(),
                creator_name: "Alice".into(),
                holder_address: "addrA".into(),
                category: "image".into(),
                description: "a painting".into(),
            },
            Timestamp::from_unix(0).unwrap(),
        )
    }

    #[test]
    fn test_transfer_is_valid() {
        let before = live();
        let mut after = before.clone();
        after.transfer("addrB", Timestamp::from_unix(60).unwrap());

        assert!(check_record_invariants(&before, &after).is_valid());
    }

    #[test]
    fn test_delete_is_valid() {
        let before = live();
        let mut after = before.clone();
        after.mark_deleted("addrA", Timestamp::from_unix(60).unwrap());

        assert!(check_record_invariants(&before, &after).is_valid());
    }

    #[test]
    fn test_identity_change_detected() {
        let before = live();
        let mut after = before.clone();
        after.creator_name = "Mallory".into();
        after.history.push("edit".into());

        let result = check_record_invariants(&before, &after);
        assert_eq!(result.violations(), &[InvariantViolation::IdentityChanged]);
    }

    #[test]
    fn test_history_rewrite_detected() {
        let before = live();
        let mut after = before.clone();
        after.history = vec!["forged".into(), "second".into()];

        assert!(!check_history_append_invariant(&before, &after));
    }

    #[test]
    fn test_missing_history_entry_detected() {
        let before = live();
        let mut after = before.clone();
        after.holder_address = "addrB".into();

        let result = check_record_invariants(&before, &after);
        assert!(matches!(
            result.violations(),
            [InvariantViolation::HistoryNotAppended { before: 1, after: 1 }]
        ));
    }

    #[test]
    fn test_revival_detected() {
        let mut before = live();
        before.deleted = true;
        let mut after = before.clone();
        after.deleted = false;
        after.history.push("undelete".into());

        let result = check_record_invariants(&before, &after);
        assert!(result.violations().contains(&InvariantViolation::TombstoneCleared));
        assert!(result.violations().iter().any(|v| matches!(
            v,
            InvariantViolation::IllegalTransition { .. }
        )));
    }

    #[test]
    fn test_mutating_deleted_record_is_illegal() {
        let mut before = live();
        before.deleted = true;
        let mut after = before.clone();
        after.transfer("addrB", Timestamp::from_unix(60).unwrap());

        assert!(!check_transition_invariant(&before, &after));
    }
}
