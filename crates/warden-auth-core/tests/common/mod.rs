//! Common test utilities for warden-auth-core integration tests

#![allow(dead_code)]

pub mod failing_repo;

use std::sync::Arc;

use warden_auth_core::{
    AccountService, AuthConfig, AuthGuard, Authenticator, CredentialHasher, TodoService,
    TokenCodec,
};
use warden_db::{MemoryAccountRepository, MemoryTodoRepository};

#[allow(unused_imports)]
pub use failing_repo::FailingAccountRepository;

/// Signing key used by every integration test
pub const TEST_SIGNING_KEY: &str = "integration-test-signing-key-0123456789";

/// Config with the cheapest bcrypt cost
pub fn test_config() -> AuthConfig {
    AuthConfig::new(TEST_SIGNING_KEY).with_hash_cost(4)
}

/// The auth core wired against in-memory stores
pub struct TestApp {
    pub config: AuthConfig,
    pub accounts: Arc<MemoryAccountRepository>,
    pub authenticator: Authenticator<MemoryAccountRepository>,
    pub account_service: AccountService<MemoryAccountRepository>,
    pub todo_service: TodoService<MemoryTodoRepository>,
    pub guard: AuthGuard,
    pub codec: TokenCodec,
}

impl TestApp {
    pub fn new() -> Self {
        let config = test_config();
        let accounts = Arc::new(MemoryAccountRepository::new());
        let codec = TokenCodec::new(&config).unwrap();
        let hasher = CredentialHasher::new(config.signing_key.as_str(), config.hash_cost);

        Self {
            authenticator: Authenticator::from_parts(
                Arc::clone(&accounts),
                hasher.clone(),
                codec.clone(),
            ),
            account_service: AccountService::new(Arc::clone(&accounts), hasher),
            todo_service: TodoService::new(Arc::new(MemoryTodoRepository::new())),
            guard: AuthGuard::new(codec.clone()),
            codec,
            accounts,
            config,
        }
    }
}
