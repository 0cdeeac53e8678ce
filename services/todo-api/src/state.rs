//! Application state for the Todo API service.

use std::sync::Arc;

use warden_auth_core::{
    AccountService, AuthError, AuthGuard, Authenticator, CredentialHasher, TodoService,
    TokenCodec,
};
use warden_db::{
    AccountRepository, DbPool, MemoryAccountRepository, MemoryTodoRepository, TodoRepository,
};

use crate::config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Login and registration
    pub authenticator: Arc<Authenticator<dyn AccountRepository>>,
    /// Profile reads and self-service updates
    pub accounts: Arc<AccountService<dyn AccountRepository>>,
    /// Todo use cases
    pub todos: Arc<TodoService<dyn TodoRepository>>,
    /// Bearer-token guard for protected routes
    pub guard: AuthGuard,
    /// Database pool; `None` for in-memory storage
    pub pool: Option<DbPool>,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state over the given stores
    pub fn new(
        config: Config,
        accounts: Arc<dyn AccountRepository>,
        todos: Arc<dyn TodoRepository>,
        pool: Option<DbPool>,
    ) -> Result<Self, AuthError> {
        let codec = TokenCodec::new(&config.auth)?;
        let hasher = CredentialHasher::new(config.auth.signing_key.as_str(), config.auth.hash_cost);
        hasher.validate()?;
        hasher.prepare_dummy();

        Ok(Self {
            authenticator: Arc::new(Authenticator::from_parts(
                Arc::clone(&accounts),
                hasher.clone(),
                codec.clone(),
            )),
            accounts: Arc::new(AccountService::new(accounts, hasher)),
            todos: Arc::new(TodoService::new(todos)),
            guard: AuthGuard::new(codec),
            pool,
            config: Arc::new(config),
        })
    }

    /// Application state backed by empty in-memory stores
    pub fn in_memory(config: Config) -> Result<Self, AuthError> {
        Self::new(
            config,
            Arc::new(MemoryAccountRepository::new()),
            Arc::new(MemoryTodoRepository::new()),
            None,
        )
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
