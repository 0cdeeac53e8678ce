//! Credential hashing
//!
//! Secrets are stored as bcrypt hashes of `secret ++ pepper`, where the pepper
//! is the server-wide signing key. bcrypt reads at most 72 bytes of input, so
//! only the leading bytes of very long secrets take part in the hash.

use std::sync::{Arc, OnceLock};

use crate::AuthError;

/// Lowest work factor bcrypt accepts
pub const MIN_HASH_COST: u32 = 4;

/// Highest work factor bcrypt accepts
pub const MAX_HASH_COST: u32 = 31;

/// Input hashed once per hasher to build the stand-in for missing accounts
const DUMMY_SECRET: &str = "warden-dummy-secret";

/// Hashes and verifies account secrets.
#[derive(Clone)]
pub struct CredentialHasher {
    pepper: Arc<str>,
    cost: u32,
    dummy_hash: Arc<OnceLock<String>>,
}

impl CredentialHasher {
    /// Create a hasher for the given pepper and bcrypt work factor
    pub fn new(pepper: impl Into<Arc<str>>, cost: u32) -> Self {
        Self {
            pepper: pepper.into(),
            cost,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Configured work factor
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Check the work factor against bcrypt's accepted range
    pub fn validate(&self) -> Result<(), AuthError> {
        if (MIN_HASH_COST..=MAX_HASH_COST).contains(&self.cost) {
            Ok(())
        } else {
            Err(AuthError::HashingFailed(format!(
                "work factor {} outside accepted range {MIN_HASH_COST}..={MAX_HASH_COST}",
                self.cost
            )))
        }
    }

    /// Hash a secret with a fresh random salt
    pub fn hash(&self, secret: &str) -> Result<String, AuthError> {
        bcrypt::hash(self.peppered(secret), self.cost)
            .map_err(|e| AuthError::HashingFailed(e.to_string()))
    }

    /// Check a secret against a stored hash.
    ///
    /// A malformed stored hash verifies as `false`.
    pub fn verify(&self, secret: &str, hash: &str) -> bool {
        match bcrypt::verify(self.peppered(secret), hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::debug!(error = %e, "Stored hash could not be checked");
                false
            }
        }
    }

    /// Spend one verification's worth of work against a throwaway hash.
    ///
    /// Used when no account matched so that the response time of a failed
    /// login does not reveal whether the account exists.
    pub fn verify_dummy(&self, secret: &str) {
        let _ = self.verify(secret, self.dummy_hash());
    }

    /// Compute the stand-in hash now instead of on the first unknown-account
    /// login, which would otherwise pay for two bcrypt runs.
    pub fn prepare_dummy(&self) {
        self.dummy_hash();
    }

    fn dummy_hash(&self) -> &str {
        self.dummy_hash
            .get_or_init(|| bcrypt::hash(DUMMY_SECRET, self.cost).unwrap_or_default())
    }

    /// [`CredentialHasher::hash`] on the blocking thread pool
    pub async fn hash_blocking(&self, secret: String) -> Result<String, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {e}")))?
    }

    /// [`CredentialHasher::verify`] on the blocking thread pool
    pub async fn verify_blocking(&self, secret: String, hash: String) -> Result<bool, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))
    }

    /// [`CredentialHasher::verify_dummy`] on the blocking thread pool
    pub async fn verify_dummy_blocking(&self, secret: String) -> Result<(), AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_dummy(&secret))
            .await
            .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))
    }

    fn peppered(&self, secret: &str) -> String {
        let mut input = String::with_capacity(secret.len() + self.pepper.len());
        input.push_str(secret);
        input.push_str(&self.pepper);
        input
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new("p".repeat(32), MIN_HASH_COST)
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let hasher = hasher();
        let hash = hasher.hash("hunter2").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(hasher.verify("hunter2", &hash));
        assert!(!hasher.verify("hunter3", &hash));
    }

    #[test]
    fn test_salt_is_fresh() {
        let hasher = hasher();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("same", &a));
        assert!(hasher.verify("same", &b));
    }

    #[test]
    fn test_pepper_is_part_of_hash() {
        let hash = hasher().hash("secret").unwrap();
        let other = CredentialHasher::new("q".repeat(32), MIN_HASH_COST);
        assert!(!other.verify("secret", &hash));
    }

    #[test]
    fn test_malformed_hash_is_false() {
        let hasher = hasher();
        assert!(!hasher.verify("secret", "not-a-bcrypt-hash"));
        assert!(!hasher.verify("secret", ""));
    }

    #[test]
    fn test_invalid_cost() {
        let hasher = CredentialHasher::new("p".repeat(32), 2);
        assert!(matches!(hasher.validate(), Err(AuthError::HashingFailed(_))));
        assert!(matches!(hasher.hash("x"), Err(AuthError::HashingFailed(_))));
    }

    #[test]
    fn test_verify_dummy_does_not_panic() {
        let hasher = hasher();
        hasher.verify_dummy("anything");
        hasher.verify_dummy("");
    }

    #[test]
    fn test_prepare_dummy_is_eager_and_shared() {
        let hasher = hasher();
        let clone = hasher.clone();
        assert!(hasher.dummy_hash.get().is_none());

        hasher.prepare_dummy();
        let hash = clone.dummy_hash.get().expect("dummy hash computed");
        assert!(hash.starts_with(&format!("$2b${:02}$", MIN_HASH_COST)));
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hasher = hasher();
        let hash = hasher.hash_blocking("secret".into()).await.unwrap();
        assert!(hasher
            .verify_blocking("secret".into(), hash.clone())
            .await
            .unwrap());
        assert!(!hasher.verify_blocking("wrong".into(), hash).await.unwrap());
    }
}
