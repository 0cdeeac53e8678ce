//! Account repository whose every call fails, for store-outage tests

use async_trait::async_trait;
use warden_db::{
    AccountRepository, AccountRow, CreateAccount, DbError, DbResult, UpdateAccount,
};
use warden_types::AccountId;

#[derive(Default)]
pub struct FailingAccountRepository;

fn outage<T>() -> DbResult<T> {
    Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl AccountRepository for FailingAccountRepository {
    async fn find_by_id(&self, _id: AccountId) -> DbResult<Option<AccountRow>> {
        outage()
    }

    async fn find_by_username(&self, _username: &str) -> DbResult<Option<AccountRow>> {
        outage()
    }

    async fn find_by_email(&self, _email: &str) -> DbResult<Option<AccountRow>> {
        outage()
    }

    async fn find_by_username_or_email(
        &self,
        _username: &str,
        _email: &str,
    ) -> DbResult<Option<AccountRow>> {
        outage()
    }

    async fn find_all(&self) -> DbResult<Vec<AccountRow>> {
        outage()
    }

    async fn create(&self, _account: CreateAccount) -> DbResult<AccountRow> {
        outage()
    }

    async fn update(&self, _id: AccountId, _changes: UpdateAccount) -> DbResult<AccountRow> {
        outage()
    }

    async fn soft_delete(&self, _id: AccountId) -> DbResult<()> {
        outage()
    }
}
