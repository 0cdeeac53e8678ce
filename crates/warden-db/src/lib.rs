//! Warden DB - Account and todo stores
//!
//! SQLx-based PostgreSQL repositories plus in-memory equivalents used by
//! tests and by the service's `memory` storage mode.
//!
//! # Example
//!
//! ```rust,ignore
//! use warden_db::{create_pool, run_migrations, Repositories};
//!
//! let pool = create_pool("postgres://localhost/warden").await?;
//! run_migrations(&pool).await?;
//! let repos = Repositories::new(pool);
//!
//! let account = repos.accounts.find_by_username("alice").await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use memory::{MemoryAccountRepository, MemoryTodoRepository};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, run_migrations, DbPool};
pub use repo::*;
