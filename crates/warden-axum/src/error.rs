//! Error types for the guard middleware and extractors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use warden_auth_core::AuthError;

/// JSON error body: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Build a JSON error response
pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    let body = ErrorEnvelope {
        error: ErrorBody {
            code: code.to_string(),
            message: message.into(),
        },
    };
    (status, Json(body)).into_response()
}

/// Guard and extractor rejections.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// The guard rejected the request's credential.
    #[error(transparent)]
    Rejected(#[from] AuthError),

    /// A handler asked for an identity but no guard ran in front of it.
    #[error("authentication required")]
    Unauthenticated,
}

impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        match self {
            Self::Rejected(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                error_response(status, err.error_code(), err.public_message())
            }
            Self::Unauthenticated => {
                let err = AuthError::MissingCredential;
                error_response(
                    StatusCode::UNAUTHORIZED,
                    err.error_code(),
                    err.public_message(),
                )
            }
        }
    }
}
