//! Warden Auth Core - Authentication and authorization logic
//!
//! Credential hashing, signed identity tokens, the bearer-credential guard,
//! and the single-owner policy enforced by every mutating operation on todos
//! and accounts.
//!
//! Everything here is configured once from an immutable [`AuthConfig`] and is
//! safe to share across request tasks.

pub mod accounts;
pub mod authenticator;
pub mod config;
pub mod crypto;
pub mod error;
pub mod guard;
pub mod password;
pub mod policy;
pub mod todos;
pub mod token;

pub use accounts::AccountService;
pub use authenticator::Authenticator;
pub use config::AuthConfig;
pub use crypto::{constant_time_eq, HmacKey, HmacKeyError};
pub use error::{AuthError, ErrorKind};
pub use guard::{extract_bearer, AuthGuard};
pub use password::CredentialHasher;
pub use policy::{can_mutate, ensure_can_mutate, Owned};
pub use todos::TodoService;
pub use token::{Claims, TokenCodec, TokenError, TokenHeader};
