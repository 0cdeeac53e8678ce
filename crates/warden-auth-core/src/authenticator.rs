//! Login and registration

use std::sync::Arc;

use chrono::{DateTime, Utc};
use warden_db::{AccountRepository, CreateAccount};
use warden_types::{Account, Identity};

use crate::{AuthConfig, AuthError, CredentialHasher, TokenCodec};

/// Exchanges credentials for tokens and registers new accounts
pub struct Authenticator<A: AccountRepository + ?Sized> {
    accounts: Arc<A>,
    hasher: CredentialHasher,
    codec: TokenCodec,
}

impl<A: AccountRepository + ?Sized> Authenticator<A> {
    /// Create an authenticator from the auth configuration
    pub fn new(config: &AuthConfig, accounts: Arc<A>) -> Result<Self, AuthError> {
        let hasher = CredentialHasher::new(config.signing_key.as_str(), config.hash_cost);
        hasher.validate()?;
        hasher.prepare_dummy();
        Ok(Self::from_parts(accounts, hasher, TokenCodec::new(config)?))
    }

    /// Create an authenticator from an existing hasher and codec
    pub fn from_parts(accounts: Arc<A>, hasher: CredentialHasher, codec: TokenCodec) -> Self {
        Self {
            accounts,
            hasher,
            codec,
        }
    }

    /// Token codec used for issuing
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Log in by username or email.
    ///
    /// Unknown accounts and wrong secrets are distinct variants internally
    /// but share the same [`ErrorKind`](crate::ErrorKind).
    pub async fn login(
        &self,
        identifier: &str,
        secret: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let account = match self.accounts.find_by_username(identifier).await? {
            Some(account) => Some(account),
            None => self.accounts.find_by_email(identifier).await?,
        };

        let Some(account) = account else {
            self.hasher.verify_dummy_blocking(secret.to_string()).await?;
            tracing::debug!(identifier = %identifier, "Login failed: no matching account");
            return Err(AuthError::AccountNotFound);
        };

        let verified = self
            .hasher
            .verify_blocking(secret.to_string(), account.password_hash.clone())
            .await?;
        if !verified {
            tracing::debug!(account_id = account.id, "Login failed: secret mismatch");
            return Err(AuthError::InvalidCredential);
        }

        let token = self
            .codec
            .issue(account.account_id(), &account.username, now)?;
        tracing::info!(account_id = account.id, "Login succeeded");
        Ok(token)
    }

    /// Register a new account
    pub async fn register(
        &self,
        username: &str,
        secret: &str,
        email: &str,
    ) -> Result<Account, AuthError> {
        if username.is_empty() || secret.is_empty() || email.is_empty() {
            return Err(AuthError::InvalidInput(
                "username, password and email are required".to_string(),
            ));
        }

        if self
            .accounts
            .find_by_username_or_email(username, email)
            .await?
            .is_some()
        {
            tracing::debug!(username = %username, "Registration rejected: username or email taken");
            return Err(AuthError::Conflict(
                "username or email already in use".to_string(),
            ));
        }

        let password_hash = self.hasher.hash_blocking(secret.to_string()).await?;
        let row = self
            .accounts
            .create(CreateAccount {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(account_id = row.id, "Account registered");
        Ok(row.to_account())
    }

    /// Verify a bare token and return the identity it asserts
    pub fn verify_token(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        let claims = self.codec.parse(token, now).map_err(|e| {
            tracing::debug!(reason = %e, "Token rejected");
            AuthError::InvalidToken(e)
        })?;
        Ok(claims.identity())
    }
}
