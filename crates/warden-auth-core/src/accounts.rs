//! Account operations with self-ownership enforcement

use std::sync::Arc;

use warden_db::{AccountRepository, AccountRow, UpdateAccount};
use warden_types::{Account, AccountChanges, AccountId, Identity};

use crate::policy::ensure_can_mutate;
use crate::{AuthError, CredentialHasher};

/// Account use cases. Profiles are readable by any authenticated identity;
/// an account may update or remove only itself.
pub struct AccountService<A: AccountRepository + ?Sized> {
    accounts: Arc<A>,
    hasher: CredentialHasher,
}

impl<A: AccountRepository + ?Sized> AccountService<A> {
    pub fn new(accounts: Arc<A>, hasher: CredentialHasher) -> Self {
        Self { accounts, hasher }
    }

    pub async fn list(&self) -> Result<Vec<Account>, AuthError> {
        let rows = self.accounts.find_all().await?;
        Ok(rows.iter().map(AccountRow::to_account).collect())
    }

    pub async fn find_by_id(&self, id: AccountId) -> Result<Account, AuthError> {
        self.accounts
            .find_by_id(id)
            .await?
            .map(|row| row.to_account())
            .ok_or(AuthError::NotFound("account"))
    }

    /// Update the caller's own profile. A new secret is hashed before it is
    /// stored; a taken username or email yields `Conflict`.
    pub async fn update_profile(
        &self,
        id: AccountId,
        changes: AccountChanges,
        identity: &Identity,
    ) -> Result<Account, AuthError> {
        let current = self.owned(id, identity).await?;

        let blank = |value: &Option<String>| value.as_deref().is_some_and(str::is_empty);
        if blank(&changes.username) || blank(&changes.email) || blank(&changes.secret) {
            return Err(AuthError::InvalidInput(
                "username, password and email must not be empty".to_string(),
            ));
        }
        if changes.is_empty() {
            return Ok(current.to_account());
        }

        let password_hash = match changes.secret {
            Some(secret) => Some(self.hasher.hash_blocking(secret).await?),
            None => None,
        };

        let row = self
            .accounts
            .update(
                id,
                UpdateAccount {
                    username: changes.username,
                    email: changes.email,
                    password_hash,
                },
            )
            .await
            .map_err(not_found)?;

        tracing::info!(account_id = row.id, "Account updated");
        Ok(row.to_account())
    }

    /// Soft-delete the caller's own account
    pub async fn remove(&self, id: AccountId, identity: &Identity) -> Result<(), AuthError> {
        self.owned(id, identity).await?;
        self.accounts.soft_delete(id).await.map_err(not_found)?;
        tracing::info!(account_id = %id, "Account removed");
        Ok(())
    }

    async fn owned(&self, id: AccountId, identity: &Identity) -> Result<AccountRow, AuthError> {
        let row = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or(AuthError::NotFound("account"))?;
        ensure_can_mutate(identity, &row)?;
        Ok(row)
    }
}

fn not_found(err: warden_db::DbError) -> AuthError {
    match err {
        warden_db::DbError::NotFound => AuthError::NotFound("account"),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuthConfig, Authenticator};
    use chrono::Utc;
    use warden_db::MemoryAccountRepository;

    struct Fixture {
        auth: Authenticator<MemoryAccountRepository>,
        service: AccountService<MemoryAccountRepository>,
    }

    fn fixture() -> Fixture {
        let config = AuthConfig::new("account-test-signing-key-long-enough-01").with_hash_cost(4);
        let repo = Arc::new(MemoryAccountRepository::new());
        let hasher = CredentialHasher::new(config.signing_key.as_str(), config.hash_cost);
        Fixture {
            auth: Authenticator::new(&config, Arc::clone(&repo)).unwrap(),
            service: AccountService::new(repo, hasher),
        }
    }

    fn identity_of(account: &Account) -> Identity {
        Identity::new(account.id, account.username.clone())
    }

    #[tokio::test]
    async fn test_update_own_secret() {
        let f = fixture();
        let alice = f.auth.register("alice", "old", "alice@example.com").await.unwrap();

        let changes = AccountChanges {
            secret: Some("new".into()),
            ..Default::default()
        };
        f.service
            .update_profile(alice.id, changes, &identity_of(&alice))
            .await
            .unwrap();

        assert!(f.auth.login("alice", "new", Utc::now()).await.is_ok());
        assert!(matches!(
            f.auth.login("alice", "old", Utc::now()).await,
            Err(AuthError::InvalidCredential)
        ));
    }

    #[tokio::test]
    async fn test_cannot_update_other_account() {
        let f = fixture();
        let alice = f.auth.register("alice", "pw", "alice@example.com").await.unwrap();
        let bob = f.auth.register("bob", "pw", "bob@example.com").await.unwrap();

        let changes = AccountChanges {
            email: Some("owned@example.com".into()),
            ..Default::default()
        };
        let result = f
            .service
            .update_profile(alice.id, changes, &identity_of(&bob))
            .await;
        assert!(matches!(result, Err(AuthError::Forbidden)));

        let result = f.service.remove(alice.id, &identity_of(&bob)).await;
        assert!(matches!(result, Err(AuthError::Forbidden)));
    }

    #[tokio::test]
    async fn test_username_conflict() {
        let f = fixture();
        f.auth.register("alice", "pw", "alice@example.com").await.unwrap();
        let bob = f.auth.register("bob", "pw", "bob@example.com").await.unwrap();

        let changes = AccountChanges {
            username: Some("alice".into()),
            ..Default::default()
        };
        let result = f
            .service
            .update_profile(bob.id, changes, &identity_of(&bob))
            .await;
        assert!(matches!(result, Err(AuthError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_remove_own_account() {
        let f = fixture();
        let alice = f.auth.register("alice", "pw", "alice@example.com").await.unwrap();

        f.service.remove(alice.id, &identity_of(&alice)).await.unwrap();

        assert!(matches!(
            f.service.find_by_id(alice.id).await,
            Err(AuthError::NotFound("account"))
        ));
        assert!(matches!(
            f.auth.login("alice", "pw", Utc::now()).await,
            Err(AuthError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn test_missing_account_not_found() {
        let f = fixture();
        let ghost = Identity::new(AccountId(77), "ghost");
        let result = f.service.remove(AccountId(77), &ghost).await;
        assert!(matches!(result, Err(AuthError::NotFound("account"))));
    }

    #[tokio::test]
    async fn test_list_excludes_removed() {
        let f = fixture();
        let alice = f.auth.register("alice", "pw", "alice@example.com").await.unwrap();
        f.auth.register("bob", "pw", "bob@example.com").await.unwrap();
        f.service.remove(alice.id, &identity_of(&alice)).await.unwrap();

        let accounts = f.service.list().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].username, "bob");
    }
}
