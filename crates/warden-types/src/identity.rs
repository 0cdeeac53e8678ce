//! Verified identity types

use serde::{Deserialize, Serialize};

use crate::AccountId;

/// The identity a verified bearer token asserts.
///
/// Produced only by the authorization guard after the token signature and
/// validity window have been checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub account_id: AccountId,
    pub username: String,
}

impl Identity {
    pub fn new(account_id: AccountId, username: impl Into<String>) -> Self {
        Self {
            account_id,
            username: username.into(),
        }
    }
}
