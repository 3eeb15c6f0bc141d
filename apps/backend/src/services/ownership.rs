//! Ownership verification: only a record's creator may mutate it.

use tracing::{info, warn};

use crate::identity::UserProfile;
use crate::store::{StoreError, TodoStore};

/// Outcome of comparing the requester against a record's creator.
///
/// The variants are distinguished internally for diagnostics; callers
/// collapse every non-`Confirmed` outcome into the same unauthorized
/// response, so the external contract cannot be used to probe whether a
/// record exists.
#[derive(Debug)]
pub enum OwnershipCheck {
    Confirmed,
    Mismatch,
    NotFound,
    StoreUnavailable(StoreError),
}

impl OwnershipCheck {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, OwnershipCheck::Confirmed)
    }
}

/// Fetch the current record and confirm its `createdBy` equals the resolved
/// identity's email. Ownership is only ever checked against a record that is
/// confirmed to exist; a missing record or an unreachable store is its own
/// variant.
pub async fn verify_created_by(
    store: &dyn TodoStore,
    profile: &UserProfile,
    todo_id: &str,
) -> OwnershipCheck {
    match store.get(todo_id).await {
        Ok(record) => {
            if record.created_by == profile.email {
                OwnershipCheck::Confirmed
            } else {
                info!(todo_id = %todo_id, "ownership mismatch");
                OwnershipCheck::Mismatch
            }
        }
        Err(StoreError::NotFound(_)) => {
            info!(todo_id = %todo_id, "ownership check against missing record");
            OwnershipCheck::NotFound
        }
        Err(e) => {
            warn!(todo_id = %todo_id, error = %e, "ownership lookup failed");
            OwnershipCheck::StoreUnavailable(e)
        }
    }
}
