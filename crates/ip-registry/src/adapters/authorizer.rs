//! # Authorization Adapters
//!
//! [`PermitAll`] is the default and matches the deployed contract, where
//! ownership checks exist only as a design. [`OwnerAuthorizer`] enforces them:
//!
//! | Action | Allowed callers |
//! |--------|-----------------|
//! | Transfer | current holder |
//! | Delete | current holder, deployment creator |

use crate::domain::entities::Record;
use crate::ports::outbound::{Authorizer, GuardedAction};

/// Allows every caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct PermitAll;

impl Authorizer for PermitAll {
    fn authorize(
        &self,
        _action: GuardedAction,
        _caller: &str,
        _record: &Record,
        _contract_creator: Option<&str>,
    ) -> bool {
        true
    }
}

/// Holder-based authorization.
#[derive(Clone, Copy, Debug, Default)]
pub struct OwnerAuthorizer;

impl Authorizer for OwnerAuthorizer {
    fn authorize(
        &self,
        action: GuardedAction,
        caller: &str,
        record: &Record,
        contract_creator: Option<&str>,
    ) -> bool {
        if caller == record.holder_address {
            return true;
        }
        match action {
            GuardedAction::Transfer => false,
            // An empty or unset creator never matches.
            GuardedAction::Delete => contract_creator.is_some_and(|c| !c.is_empty() && c == caller),
        }
    }

    fn needs_contract_creator(&self) -> bool {
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
