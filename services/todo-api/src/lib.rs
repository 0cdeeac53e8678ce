//! Warden Todo API
//!
//! Todo service where every account may read every todo but only the owner
//! may change or delete one.
//!
//! ## Public Endpoints
//!
//! - `POST /api/v1/token` - Log in; returns a bearer token
//! - `POST /api/v1/register` - Create an account
//!
//! ## Bearer-Protected Endpoints
//!
//! - `GET /api/v1/users` - List accounts
//! - `GET|PUT|DELETE /api/v1/users/{id}` - Read, update or remove an account
//! - `GET|POST /api/v1/todos` - List or create todos
//! - `GET /api/v1/todos/my` - List the caller's todos
//! - `GET|PUT|DELETE /api/v1/todos/{id}` - Read, update or delete a todo
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod state;

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use warden_axum::GuardLayer;

use crate::handlers::{health, ready};
use crate::state::AppState;

/// CORS policy. With a configured origin the browser may send and receive
/// the login cookie; without one any origin is allowed, credentials are not.
fn cors_layer(allowed_origin: Option<&HeaderValue>) -> CorsLayer {
    match allowed_origin {
        // Credentialed CORS forbids wildcards
        Some(origin) => CorsLayer::new()
            .allow_origin(AllowOrigin::exact(origin.clone()))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::ORIGIN,
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
            ])
            .expose_headers([
                header::CONTENT_LENGTH,
                header::CONTENT_TYPE,
                header::SET_COOKIE,
            ])
            .allow_credentials(true)
            .max_age(Duration::from_secs(12 * 60 * 60)),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

/// Build the HTTP router with its middleware stack
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout();

    // Public auth routes
    let public = Router::new()
        .route("/token", post(handlers::login))
        .route("/register", post(handlers::register));

    // Everything below requires a valid bearer token
    let protected = Router::new()
        .route("/users", get(handlers::list_users))
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route("/todos/my", get(handlers::list_my_todos))
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route_layer(GuardLayer::new(state.guard.clone()));

    let api_v1 = public.merge(protected);

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS
        .layer(cors_layer(state.config.cors_allowed_origin.as_ref()))
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .nest("/api/v1", api_v1)
        .layer(middleware)
        .merge(health_routes) // Health routes without timeout
        .with_state(state)
}
