//! Signed identity tokens
//!
//! Tokens are compact HS256 JWTs: `base64url(header).base64url(claims).base64url(mac)`,
//! all segments unpadded. The MAC is HMAC-SHA256 over the first two segments.

use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use warden_types::{AccountId, Identity};

use crate::crypto::HmacKey;
use crate::{AuthConfig, AuthError};

/// The only signing algorithm tokens may declare
pub const TOKEN_ALGORITHM: &str = "HS256";

/// Token type written into the header
pub const TOKEN_TYPE: &str = "JWT";

/// Reasons a token fails to parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("unexpected signing algorithm: {0}")]
    UnexpectedAlgorithm(String),
}

/// Token header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Default for TokenHeader {
    fn default() -> Self {
        Self {
            alg: TOKEN_ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        }
    }
}

/// Token claims. Timestamps are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: AccountId,
    pub username: String,
    pub iss: String,
    pub sub: String,
    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,
}

impl Claims {
    /// Identity asserted by these claims
    pub fn identity(&self) -> Identity {
        Identity::new(self.user_id, self.username.clone())
    }
}

/// Issues and verifies identity tokens
#[derive(Clone)]
pub struct TokenCodec {
    key: HmacKey,
    ttl: Duration,
    issuer: Arc<str>,
}

impl TokenCodec {
    /// Create a codec from the auth configuration.
    ///
    /// # Errors
    /// `Configuration` if the signing key is shorter than
    /// [`HmacKey::MIN_KEY_LENGTH`].
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let key = HmacKey::new(&config.signing_key)
            .map_err(|e| AuthError::Configuration(e.to_string()))?;
        Ok(Self {
            key,
            ttl: config.token_ttl,
            issuer: Arc::from(config.issuer.as_str()),
        })
    }

    /// Token validity window
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for the account, valid from `now` for the configured ttl
    pub fn issue(
        &self,
        account_id: AccountId,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|_| AuthError::Configuration("token lifetime too large".to_string()))?;

        let claims = Claims {
            user_id: account_id,
            username: username.to_string(),
            iss: self.issuer.to_string(),
            sub: account_id.to_string(),
            exp: iat.saturating_add(ttl),
            nbf: iat,
            iat,
        };

        let header = encode_segment(&TokenHeader::default())?;
        let payload = encode_segment(&claims)?;
        let signing_input = format!("{header}.{payload}");
        let signature = URL_SAFE_NO_PAD.encode(self.key.sign(signing_input.as_bytes()));

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verify a token and return its claims.
    ///
    /// The header algorithm and signature are checked before any claim is
    /// read, so a forged token never reports `Expired`.
    pub fn parse(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Malformed);
        };

        if header_b64.is_empty() || payload_b64.is_empty() || signature_b64.is_empty() {
            return Err(TokenError::Malformed);
        }

        let header: TokenHeader = decode_segment(header_b64)?;
        if header.alg != TOKEN_ALGORITHM {
            return Err(TokenError::UnexpectedAlgorithm(header.alg));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::BadSignature)?;
        let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
        if !self.key.verify(signing_input.as_bytes(), &signature) {
            return Err(TokenError::BadSignature);
        }

        let claims: Claims = decode_segment(payload_b64)?;

        let now = now.timestamp();
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        if now < claims.nbf {
            return Err(TokenError::NotYetValid);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| AuthError::Internal(format!("token serialization failed: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}
