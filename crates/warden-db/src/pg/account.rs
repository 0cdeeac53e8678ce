//! PostgreSQL account repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use warden_types::AccountId;

use crate::error::{DbError, DbResult};
use crate::models::AccountRow;
use crate::repo::{AccountRepository, CreateAccount, UpdateAccount};

const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, delete_flag, created_at, updated_at";

/// PostgreSQL account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one_where(&self, predicate: &str, value: &str) -> DbResult<Option<AccountRow>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users WHERE {predicate} = $1 AND delete_flag = FALSE"
        );
        let account = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_id(&self, id: AccountId) -> DbResult<Option<AccountRow>> {
        let sql =
            format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1 AND delete_flag = FALSE");
        let account = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<AccountRow>> {
        self.find_one_where("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<AccountRow>> {
        self.find_one_where("email", email).await
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> DbResult<Option<AccountRow>> {
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} FROM users \
             WHERE (username = $1 OR email = $2) AND delete_flag = FALSE \
             LIMIT 1"
        );
        let account = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    async fn find_all(&self) -> DbResult<Vec<AccountRow>> {
        let sql =
            format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE delete_flag = FALSE ORDER BY id");
        let accounts = sqlx::query_as::<_, AccountRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }

    async fn create(&self, account: CreateAccount) -> DbResult<AccountRow> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password_hash)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update(&self, id: AccountId, changes: UpdateAccount) -> DbResult<AccountRow> {
        let sql = format!(
            "UPDATE users SET \
                 username = COALESCE($1, username), \
                 email = COALESCE($2, email), \
                 password_hash = COALESCE($3, password_hash), \
                 updated_at = NOW() \
             WHERE id = $4 AND delete_flag = FALSE \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(changes.username)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound)
    }

    async fn soft_delete(&self, id: AccountId) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE users SET delete_flag = TRUE, updated_at = NOW() \
             WHERE id = $1 AND delete_flag = FALSE",
        )
        .bind(id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
