//! Authentication handlers (login, register)

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use warden_types::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest};

use crate::error::ApiResult;
use crate::extractors::ApiJson;
use crate::state::AppState;

/// POST /api/v1/token
///
/// Exchange a username (or email) and password for a bearer token. The
/// token is also set as an HttpOnly `token` cookie.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let token = state
        .authenticator
        .login(&req.username, &req.password, Utc::now())
        .await?;

    let max_age = state.authenticator.codec().ttl().as_secs();
    let secure = if state.config.is_production() {
        "; Secure"
    } else {
        ""
    };
    let cookie = format!("token={token}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age}{secure}");

    let response = LoginResponse {
        message: "login successful".to_string(),
        token,
        token_type: "Bearer".to_string(),
        expires_in: max_age,
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /api/v1/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    let account = state
        .authenticator
        .register(&req.username, &req.password, &req.email)
        .await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}
