//! Bearer credential guard

use chrono::{DateTime, Utc};
use warden_types::Identity;

use crate::{AuthError, TokenCodec};

/// Required authorization scheme prefix, case-sensitive
pub const BEARER_PREFIX: &str = "Bearer ";

/// Resolves an `Authorization` header value to a verified identity.
///
/// Fails closed: every rejection is an error, and the caller must not run
/// the protected operation.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    codec: TokenCodec,
}

impl AuthGuard {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Authenticate a request by its `Authorization` header value
    pub fn authenticate(
        &self,
        header: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        let header = header
            .filter(|value| !value.is_empty())
            .ok_or(AuthError::MissingCredential)?;
        let token = extract_bearer(header)?;

        let claims = self.codec.parse(token, now).map_err(|e| {
            tracing::debug!(reason = %e, "Bearer token rejected");
            AuthError::InvalidToken(e)
        })?;

        Ok(claims.identity())
    }
}

/// Extract the token from a `Bearer <token>` header value
pub fn extract_bearer(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedCredential)?;

    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthError::MalformedCredential);
    }

    Ok(token)
}
