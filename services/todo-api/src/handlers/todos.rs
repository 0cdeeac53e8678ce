//! Todo handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use warden_axum::RequireIdentity;
use warden_types::{
    CreateTodoRequest, MessageResponse, TodoId, TodoResponse, UpdateTodoRequest,
};

use crate::error::ApiResult;
use crate::extractors::{ApiJson, ApiPath};
use crate::state::AppState;

/// GET /api/v1/todos
pub async fn list_todos(
    State(state): State<AppState>,
    _identity: RequireIdentity,
) -> ApiResult<Json<Vec<TodoResponse>>> {
    let todos = state.todos.list_all().await?;
    Ok(Json(todos.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/todos/my
pub async fn list_my_todos(
    State(state): State<AppState>,
    identity: RequireIdentity,
) -> ApiResult<Json<Vec<TodoResponse>>> {
    let todos = state.todos.list_mine(&identity).await?;
    Ok(Json(todos.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/todos
pub async fn create_todo(
    State(state): State<AppState>,
    identity: RequireIdentity,
    ApiJson(req): ApiJson<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<TodoResponse>)> {
    let todo = state
        .todos
        .create(&req.title, &req.description, &identity)
        .await?;
    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// GET /api/v1/todos/{id}
pub async fn get_todo(
    State(state): State<AppState>,
    _identity: RequireIdentity,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state.todos.find_by_id(TodoId(id)).await?;
    Ok(Json(todo.into()))
}

/// PUT /api/v1/todos/{id}
pub async fn update_todo(
    State(state): State<AppState>,
    identity: RequireIdentity,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateTodoRequest>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state
        .todos
        .update(TodoId(id), req.into(), &identity)
        .await?;
    Ok(Json(todo.into()))
}

/// DELETE /api/v1/todos/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    identity: RequireIdentity,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.todos.delete(TodoId(id), &identity).await?;
    Ok(Json(MessageResponse::new("todo deleted")))
}
