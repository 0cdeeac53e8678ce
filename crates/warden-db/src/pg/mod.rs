//! PostgreSQL repository implementations

mod account;
mod todo;

pub use account::PgAccountRepository;
pub use todo::PgTodoRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub accounts: PgAccountRepository,
    pub todos: PgTodoRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            accounts: PgAccountRepository::new(pool.clone()),
            todos: PgTodoRepository::new(pool),
        }
    }
}
