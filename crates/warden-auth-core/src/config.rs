//! Configuration types for the auth core

use std::time::Duration;

use crate::crypto::HmacKey;
use crate::password::{MAX_HASH_COST, MIN_HASH_COST};
use crate::AuthError;

/// Signing key used when `JWT_SECRET_KEY` is not set. Never acceptable in
/// production; [`AuthConfig::uses_development_key`] lets deployments refuse it.
pub const DEVELOPMENT_SIGNING_KEY: &str = "fallback_development_key_do_not_use_in_production";

/// Default bcrypt work factor
pub const DEFAULT_HASH_COST: u32 = 12;

/// Default token issuer claim
pub const DEFAULT_ISSUER: &str = "warden-todo-api";

/// Auth core configuration.
///
/// Built once at startup and treated as immutable for the process lifetime.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for token signing, also appended to secrets before hashing
    pub signing_key: String,
    /// bcrypt work factor
    pub hash_cost: u32,
    /// Token validity window
    pub token_ttl: Duration,
    /// `iss` claim written into issued tokens
    pub issuer: String,
}

impl AuthConfig {
    /// Create a new auth config with default cost, lifetime and issuer
    pub fn new(signing_key: impl Into<String>) -> Self {
        Self {
            signing_key: signing_key.into(),
            hash_cost: DEFAULT_HASH_COST,
            token_ttl: Duration::from_secs(24 * 60 * 60), // 24 hours
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }

    /// Load `JWT_SECRET_KEY` and `BCRYPT_COST_FACTOR` from the environment.
    ///
    /// Missing or unparsable values fall back to the development defaults
    /// with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`AuthConfig::from_env`] with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let signing_key = match lookup("JWT_SECRET_KEY").filter(|k| !k.is_empty()) {
            Some(key) => key,
            None => {
                tracing::warn!(
                    "JWT_SECRET_KEY is not set; using the built-in development key. \
                     Tokens and password hashes are NOT secure"
                );
                DEVELOPMENT_SIGNING_KEY.to_string()
            }
        };

        let hash_cost = match lookup("BCRYPT_COST_FACTOR") {
            None => {
                tracing::warn!(
                    cost = DEFAULT_HASH_COST,
                    "BCRYPT_COST_FACTOR is not set; using the default cost"
                );
                DEFAULT_HASH_COST
            }
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    cost = DEFAULT_HASH_COST,
                    "BCRYPT_COST_FACTOR is not a number; using the default cost"
                );
                DEFAULT_HASH_COST
            }),
        };

        Self {
            hash_cost,
            ..Self::new(signing_key)
        }
    }

    /// Whether the built-in development key is in use
    pub fn uses_development_key(&self) -> bool {
        self.signing_key == DEVELOPMENT_SIGNING_KEY
    }

    /// Validate the configuration. Intended to run once at startup; any
    /// error here is fatal.
    pub fn validate(&self) -> Result<(), AuthError> {
        HmacKey::new(&self.signing_key)
            .map_err(|e| AuthError::Configuration(e.to_string()))?;

        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.hash_cost) {
            return Err(AuthError::HashingFailed(format!(
                "work factor {} outside accepted range {MIN_HASH_COST}..={MAX_HASH_COST}",
                self.hash_cost
            )));
        }

        if self.token_ttl.is_zero() {
            return Err(AuthError::Configuration(
                "token lifetime must be positive".to_string(),
            ));
        }

        // Token timestamps are i64 seconds
        if i64::try_from(self.token_ttl.as_secs()).is_err() {
            return Err(AuthError::Configuration(
                "token lifetime too large".to_string(),
            ));
        }

        Ok(())
    }

    /// Set the bcrypt work factor
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Set the token validity window
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set the token issuer
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_key_length", &self.signing_key.len())
            .field("development_key", &self.uses_development_key())
            .field("hash_cost", &self.hash_cost)
            .field("token_ttl", &self.token_ttl)
            .field("issuer", &self.issuer)
            .finish()
    }
}
