//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use warden_types::{Account, AccountId, Todo, TodoId};

/// Account row from the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// bcrypt hash; never the plaintext secret
    pub password_hash: String,
    pub delete_flag: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Todo row from the `todos` table
#[derive(Debug, Clone, FromRow)]
pub struct TodoRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRow {
    /// Convert to domain AccountId
    pub fn account_id(&self) -> AccountId {
        AccountId(self.id)
    }

    /// Public view without the secret hash
    pub fn to_account(&self) -> Account {
        Account {
            id: self.account_id(),
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl TodoRow {
    /// Convert to domain TodoId
    pub fn todo_id(&self) -> TodoId {
        TodoId(self.id)
    }

    /// Convert to the owning AccountId
    pub fn owner_id(&self) -> AccountId {
        AccountId(self.user_id)
    }

    pub fn to_todo(&self) -> Todo {
        Todo {
            id: self.todo_id(),
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
            owner_id: self.owner_id(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
