//! Repository traits
//!
//! Async store interfaces consumed by the auth core. `Ok(None)` means the
//! record does not exist; `Err(_)` means the store itself failed. Callers
//! must treat the two differently.

use async_trait::async_trait;
use warden_types::{AccountId, TodoChanges, TodoId};

use crate::error::DbResult;
use crate::models::{AccountRow, TodoRow};

/// Account (credential) store.
///
/// Every lookup ignores soft-deleted accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by ID
    async fn find_by_id(&self, id: AccountId) -> DbResult<Option<AccountRow>>;

    /// Find an account by exact username
    async fn find_by_username(&self, username: &str) -> DbResult<Option<AccountRow>>;

    /// Find an account by exact email
    async fn find_by_email(&self, email: &str) -> DbResult<Option<AccountRow>>;

    /// Find an account whose username OR email matches
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> DbResult<Option<AccountRow>>;

    /// List all accounts
    async fn find_all(&self) -> DbResult<Vec<AccountRow>>;

    /// Create a new account. Fails with `UniqueViolation` on a username or
    /// email collision.
    async fn create(&self, account: CreateAccount) -> DbResult<AccountRow>;

    /// Apply a profile update. Fails with `NotFound` if the account is absent.
    async fn update(&self, id: AccountId, changes: UpdateAccount) -> DbResult<AccountRow>;

    /// Set the soft-delete flag. Fails with `NotFound` if the account is absent.
    async fn soft_delete(&self, id: AccountId) -> DbResult<()>;
}

/// Create account input
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Update account input; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Todo store
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Find a todo by ID
    async fn find_by_id(&self, id: TodoId) -> DbResult<Option<TodoRow>>;

    /// List all todos
    async fn find_all(&self) -> DbResult<Vec<TodoRow>>;

    /// List the todos owned by an account
    async fn find_by_owner(&self, owner_id: AccountId) -> DbResult<Vec<TodoRow>>;

    /// Create a new todo
    async fn create(&self, todo: CreateTodo) -> DbResult<TodoRow>;

    /// Update payload and completion flag. There is no way to change the
    /// owner through this call. Fails with `NotFound` if the todo is absent.
    async fn update(&self, id: TodoId, changes: &TodoChanges) -> DbResult<TodoRow>;

    /// Delete a todo. Fails with `NotFound` if the todo is absent.
    async fn delete(&self, id: TodoId) -> DbResult<()>;
}

/// Create todo input
#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub owner_id: AccountId,
    pub title: String,
    pub description: String,
}
