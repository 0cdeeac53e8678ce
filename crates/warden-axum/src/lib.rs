//! Warden Axum Integration
//!
//! Tower middleware and Axum extractors that put the bearer-token guard in
//! front of a router.
//!
//! # Quick Start
//!
//! ```ignore
//! use warden_axum::{GuardLayer, RequireIdentity};
//! use axum::{Router, routing::get};
//!
//! async fn whoami(identity: RequireIdentity) -> String {
//!     format!("Hello, {}!", identity.username)
//! }
//!
//! let app = Router::new()
//!     .route("/api/v1/me", get(whoami))
//!     .layer(GuardLayer::new(guard));
//! ```
//!
//! Every request that reaches a handler behind [`GuardLayer`] carries a
//! verified [`Identity`](warden_types::Identity). Rejected requests get a
//! 401 JSON error and never reach the handler.

pub mod error;
pub mod extractors;
pub mod layer;

pub use error::{error_response, ErrorBody, ErrorEnvelope, GuardError};
pub use extractors::{IdentityExt, MaybeIdentity, RequireIdentity};
pub use layer::{GuardLayer, GuardService, GuardServiceFuture};
