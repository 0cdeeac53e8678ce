//! In-memory repository implementations
//!
//! DashMap-backed stores with the same observable behavior as the
//! PostgreSQL repositories (soft-delete filtering, uniqueness among active
//! accounts, `NotFound` on missing updates). Used by tests and by the
//! service when it runs without a database.

mod account;
mod todo;

pub use account::MemoryAccountRepository;
pub use todo::MemoryTodoRepository;
