//! Axum extractors for the identity published by [`GuardLayer`](crate::GuardLayer).
//!
//! # Usage
//!
//! ```ignore
//! use warden_axum::{MaybeIdentity, RequireIdentity};
//!
//! // 401 if no identity was published
//! async fn mine(identity: RequireIdentity) -> String {
//!     format!("todos of {}", identity.account_id)
//! }
//!
//! // Optional identity
//! async fn greet(identity: MaybeIdentity) -> String {
//!     match identity.0 {
//!         Some(id) => format!("Hello, {}!", id.username),
//!         None => "Hello, guest!".to_string(),
//!     }
//! }
//! ```

use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use warden_types::Identity;

use crate::error::GuardError;

/// Extension key for the verified identity in request extensions.
#[derive(Debug, Clone)]
pub struct IdentityExt(pub Identity);

/// Extractor that requires a verified identity.
#[derive(Debug, Clone)]
pub struct RequireIdentity(pub Identity);

impl Deref for RequireIdentity {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireIdentity
where
    S: Send + Sync,
{
    type Rejection = GuardError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityExt>()
            .cloned()
            .map(|ext| Self(ext.0))
            .ok_or(GuardError::Unauthenticated)
    }
}

/// Extractor for an optional identity. Never rejects.
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

impl Deref for MaybeIdentity {
    type Target = Option<Identity>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<IdentityExt>()
            .cloned()
            .map(|ext| ext.0);
        Ok(Self(identity))
    }
}
