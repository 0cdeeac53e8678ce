//! Auth errors

use thiserror::Error;

use crate::token::TokenError;

/// Authentication and authorization errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// No account matches the login identifier
    #[error("account not found")]
    AccountNotFound,

    /// Secret does not match the stored hash
    #[error("invalid credential")]
    InvalidCredential,

    /// No authorization header was presented
    #[error("missing credential")]
    MissingCredential,

    /// Authorization header is not of the form `Bearer <token>`
    #[error("malformed credential")]
    MalformedCredential,

    /// Bearer token failed verification
    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    /// Username or email already taken
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller does not own the resource
    #[error("forbidden")]
    Forbidden,

    /// Referenced resource does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request payload failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Password hashing failed or the work factor is unusable
    #[error("hashing failed: {0}")]
    HashingFailed(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Public classification of an [`AuthError`].
///
/// Transports switch on this rather than on the variant so that internal
/// distinctions (unknown account vs. wrong secret) never leak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AuthenticationFailed,
    MissingCredential,
    MalformedCredential,
    InvalidCredential,
    Conflict,
    Forbidden,
    NotFound,
    InvalidInput,
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind
    pub fn status_code(self) -> u16 {
        match self {
            Self::AuthenticationFailed
            | Self::MissingCredential
            | Self::MalformedCredential
            | Self::InvalidCredential => 401,
            Self::Conflict => 409,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InvalidInput => 400,
            Self::Internal => 500,
        }
    }

    /// Error code for API responses
    pub fn error_code(self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::MalformedCredential => "MALFORMED_CREDENTIAL",
            Self::InvalidCredential => "INVALID_CREDENTIAL",
            Self::Conflict => "CONFLICT",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidInput => "INVALID_INPUT",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl AuthError {
    /// Public kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound | Self::InvalidCredential => ErrorKind::AuthenticationFailed,
            Self::MissingCredential => ErrorKind::MissingCredential,
            Self::MalformedCredential => ErrorKind::MalformedCredential,
            Self::InvalidToken(_) => ErrorKind::InvalidCredential,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::HashingFailed(_)
            | Self::Configuration(_)
            | Self::Database(_)
            | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        self.kind().error_code()
    }

    /// Message safe to return to clients.
    ///
    /// Internal details (database text, token failure reason, which half of
    /// a login failed) stay in logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::AccountNotFound | Self::InvalidCredential => "authentication failed".to_string(),
            Self::MissingCredential => "authorization header required".to_string(),
            Self::MalformedCredential => {
                "authorization header must be of the form 'Bearer <token>'".to_string()
            }
            Self::InvalidToken(_) => "invalid or expired token".to_string(),
            Self::Conflict(msg) | Self::InvalidInput(msg) => msg.clone(),
            Self::Forbidden => "you do not have permission to modify this resource".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::HashingFailed(_)
            | Self::Configuration(_)
            | Self::Database(_)
            | Self::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl From<warden_db::DbError> for AuthError {
    fn from(err: warden_db::DbError) -> Self {
        match err {
            warden_db::DbError::UniqueViolation(detail) => {
                tracing::debug!(detail = %detail, "Unique constraint violated");
                Self::Conflict("username or email already in use".to_string())
            }
            warden_db::DbError::NotFound => Self::NotFound("record"),
            other => {
                tracing::error!("Database error: {}", other);
                Self::Database(other.to_string())
            }
        }
    }
}
