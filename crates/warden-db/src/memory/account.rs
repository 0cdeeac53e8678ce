//! In-memory account repository

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use warden_types::AccountId;

use crate::error::{DbError, DbResult};
use crate::models::AccountRow;
use crate::repo::{AccountRepository, CreateAccount, UpdateAccount};

/// In-memory account repository
#[derive(Default, Clone)]
pub struct MemoryAccountRepository {
    accounts: Arc<DashMap<i64, AccountRow>>,
    next_id: Arc<AtomicI64>,
    /// Serializes writes so uniqueness checks and inserts are atomic
    write_lock: Arc<Mutex<()>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_active(&self, matches: impl Fn(&AccountRow) -> bool) -> Option<AccountRow> {
        self.accounts
            .iter()
            .filter(|r| !r.value().delete_flag && matches(r.value()))
            .min_by_key(|r| r.value().id)
            .map(|r| r.value().clone())
    }

    fn check_unique(&self, except: Option<i64>, username: &str, email: &str) -> DbResult<()> {
        let clash = self.find_active(|a| {
            Some(a.id) != except && (a.username == username || a.email == email)
        });
        match clash {
            Some(existing) if existing.username == username => {
                Err(DbError::UniqueViolation("users_username_active_key".to_string()))
            }
            Some(_) => Err(DbError::UniqueViolation("users_email_active_key".to_string())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> DbResult<Option<AccountRow>> {
        Ok(self
            .accounts
            .get(&id.0)
            .filter(|r| !r.value().delete_flag)
            .map(|r| r.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<AccountRow>> {
        Ok(self.find_active(|a| a.username == username))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<AccountRow>> {
        Ok(self.find_active(|a| a.email == email))
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> DbResult<Option<AccountRow>> {
        Ok(self.find_active(|a| a.username == username || a.email == email))
    }

    async fn find_all(&self) -> DbResult<Vec<AccountRow>> {
        let mut accounts: Vec<AccountRow> = self
            .accounts
            .iter()
            .filter(|r| !r.value().delete_flag)
            .map(|r| r.value().clone())
            .collect();
        accounts.sort_by_key(|a| a.id);
        Ok(accounts)
    }

    async fn create(&self, account: CreateAccount) -> DbResult<AccountRow> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.check_unique(None, &account.username, &account.email)?;

        let now = Utc::now();
        let row = AccountRow {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            delete_flag: false,
            created_at: now,
            updated_at: now,
        };
        self.accounts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: AccountId, changes: UpdateAccount) -> DbResult<AccountRow> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let current = self
            .accounts
            .get(&id.0)
            .filter(|r| !r.value().delete_flag)
            .map(|r| r.value().clone())
            .ok_or(DbError::NotFound)?;

        let username = changes.username.unwrap_or(current.username);
        let email = changes.email.unwrap_or(current.email);
        self.check_unique(Some(id.0), &username, &email)?;

        let row = AccountRow {
            username,
            email,
            password_hash: changes.password_hash.unwrap_or(current.password_hash),
            updated_at: Utc::now(),
            ..current
        };
        self.accounts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn soft_delete(&self, id: AccountId) -> DbResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        match self.accounts.get_mut(&id.0) {
            Some(mut account) if !account.delete_flag => {
                account.delete_flag = true;
                account.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(DbError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(username: &str, email: &str) -> CreateAccount {
        CreateAccount {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$2b$04$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_account_repo_crud() {
        let repo = MemoryAccountRepository::new();

        let alice = repo.create(new_account("alice", "a@x.com")).await.unwrap();
        assert_eq!(alice.id, 1);

        assert!(repo.find_by_username("alice").await.unwrap().is_some());
        assert!(repo.find_by_email("a@x.com").await.unwrap().is_some());
        assert!(repo.find_by_username("Alice").await.unwrap().is_none());
        assert!(repo
            .find_by_username_or_email("nobody", "a@x.com")
            .await
            .unwrap()
            .is_some());

        let updated = repo
            .update(
                alice.account_id(),
                UpdateAccount {
                    email: Some("alice@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "alice@x.com");
        assert_eq!(updated.username, "alice");

        repo.soft_delete(alice.account_id()).await.unwrap();
        assert!(repo.find_by_id(alice.account_id()).await.unwrap().is_none());
        assert!(repo.find_all().await.unwrap().is_empty());
        assert!(matches!(
            repo.soft_delete(alice.account_id()).await,
            Err(DbError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_uniqueness_among_active_accounts() {
        let repo = MemoryAccountRepository::new();
        let alice = repo.create(new_account("alice", "a@x.com")).await.unwrap();

        let dup = repo.create(new_account("alice", "other@x.com")).await;
        assert!(matches!(dup, Err(DbError::UniqueViolation(_))));

        let dup_email = repo.create(new_account("bob", "a@x.com")).await;
        assert!(matches!(dup_email, Err(DbError::UniqueViolation(_))));

        // Soft-deleted accounts release their username and email
        repo.soft_delete(alice.account_id()).await.unwrap();
        let again = repo.create(new_account("alice", "a@x.com")).await.unwrap();
        assert_ne!(again.id, alice.id);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_username() {
        let repo = MemoryAccountRepository::new();
        repo.create(new_account("alice", "a@x.com")).await.unwrap();
        let bob = repo.create(new_account("bob", "b@x.com")).await.unwrap();

        let result = repo
            .update(
                bob.account_id(),
                UpdateAccount {
                    username: Some("alice".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DbError::UniqueViolation(_))));
    }
}
