//! `/todos` route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use super::error::ApiResult;
use super::server::ApiServer;
use crate::types::{NewTodo, Todo, TodoUpdate};

/// Query parameters for the todo list.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub is_complete: Option<bool>,
}

pub async fn create_todo(
    State(state): State<ApiServer>,
    Json(new_todo): Json<NewTodo>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let todo = state.db().create_todo(new_todo)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn list_todos(
    State(state): State<ApiServer>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Todo>>> {
    Ok(Json(state.db().list_todos(params.is_complete)?))
}

pub async fn get_todo(
    State(state): State<ApiServer>,
    Path(todo_id): Path<i64>,
) -> ApiResult<Json<Todo>> {
    Ok(Json(state.db().get_todo(todo_id)?))
}

pub async fn replace_todo(
    State(state): State<ApiServer>,
    Path(todo_id): Path<i64>,
    Json(update): Json<TodoUpdate>,
) -> ApiResult<Json<Todo>> {
    Ok(Json(state.db().replace_todo(todo_id, &update)?))
}

pub async fn merge_todo(
    State(state): State<ApiServer>,
    Path(todo_id): Path<i64>,
    Json(update): Json<TodoUpdate>,
) -> ApiResult<Json<Todo>> {
    Ok(Json(state.db().merge_todo(todo_id, &update)?))
}

pub async fn delete_todo(
    State(state): State<ApiServer>,
    Path(todo_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.db().delete_todo(todo_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn complete_todo(
    State(state): State<ApiServer>,
    Path(todo_id): Path<i64>,
) -> ApiResult<Json<Todo>> {
    Ok(Json(state.db().set_completion(todo_id, true)?))
}

pub async fn reopen_todo(
    State(state): State<ApiServer>,
    Path(todo_id): Path<i64>,
) -> ApiResult<Json<Todo>> {
    Ok(Json(state.db().set_completion(todo_id, false)?))
}
