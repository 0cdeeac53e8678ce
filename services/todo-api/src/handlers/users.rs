//! Account handlers. Reads are open to any authenticated caller; updates
//! and removal only to the account itself.

use axum::extract::State;
use axum::Json;
use warden_axum::RequireIdentity;
use warden_types::{AccountId, AccountResponse, MessageResponse, UpdateAccountRequest};

use crate::error::ApiResult;
use crate::extractors::{ApiJson, ApiPath};
use crate::state::AppState;

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    _identity: RequireIdentity,
) -> ApiResult<Json<Vec<AccountResponse>>> {
    let accounts = state.accounts.list().await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _identity: RequireIdentity,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<AccountResponse>> {
    let account = state.accounts.find_by_id(AccountId(id)).await?;
    Ok(Json(account.into()))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    identity: RequireIdentity,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateAccountRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let account = state
        .accounts
        .update_profile(AccountId(id), req.into(), &identity)
        .await?;
    Ok(Json(account.into()))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    identity: RequireIdentity,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.accounts.remove(AccountId(id), &identity).await?;
    Ok(Json(MessageResponse::new("user deleted")))
}
