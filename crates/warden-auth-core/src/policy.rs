//! Resource ownership policy
//!
//! A resource may be modified or deleted only by the account that owns it.
//! Reads are not restricted here.

use warden_db::{AccountRow, TodoRow};
use warden_types::{Account, AccountId, Identity, Todo};

use crate::AuthError;

/// A resource with a single owning account
pub trait Owned {
    fn owner_id(&self) -> AccountId;
}

impl Owned for TodoRow {
    fn owner_id(&self) -> AccountId {
        AccountId(self.user_id)
    }
}

impl Owned for Todo {
    fn owner_id(&self) -> AccountId {
        self.owner_id
    }
}

// An account owns itself.
impl Owned for AccountRow {
    fn owner_id(&self) -> AccountId {
        self.account_id()
    }
}

impl Owned for Account {
    fn owner_id(&self) -> AccountId {
        self.id
    }
}

/// Whether `identity` may modify `resource`
#[inline]
pub fn can_mutate<R: Owned + ?Sized>(identity: &Identity, resource: &R) -> bool {
    identity.account_id == resource.owner_id()
}

/// [`can_mutate`], failing with `Forbidden`
pub fn ensure_can_mutate<R: Owned + ?Sized>(
    identity: &Identity,
    resource: &R,
) -> Result<(), AuthError> {
    if can_mutate(identity, resource) {
        Ok(())
    } else {
        tracing::debug!(
            account_id = %identity.account_id,
            owner_id = %resource.owner_id(),
            "Mutation rejected: not the owner"
        );
        Err(AuthError::Forbidden)
    }
}
