//! Task handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use ph_core::traits::Id;
use ph_models::{CreateComment, CreateTask, UpdateTask};
use ph_services::{
    AddCommentService, CreateTaskService, DeleteTaskService, TaskFilter, TaskQueryService,
    UpdateTaskService,
};

use crate::error::ApiResult;
use crate::extractors::{empty, AppState, AuthenticatedUser, Envelope, JsonBody, QueryParams};

/// GET /api/tasks?project=&parentTask=
pub async fn list_tasks(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    QueryParams(filter): QueryParams<TaskFilter>,
) -> ApiResult<impl IntoResponse> {
    let tasks = TaskQueryService::new(&state.ctx).list(&filter).await?;
    Ok(Envelope::list(tasks))
}

/// GET /api/tasks/:id
pub async fn get_task(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let task = TaskQueryService::new(&state.ctx).get(id).await?;
    Ok(Envelope::data(task))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(input): JsonBody<CreateTask>,
) -> ApiResult<impl IntoResponse> {
    let task = CreateTaskService::new(&state.ctx, &user).call(input).await?;
    Ok((StatusCode::CREATED, Envelope::data(task)))
}

/// PUT /api/tasks/:id
pub async fn update_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    JsonBody(input): JsonBody<UpdateTask>,
) -> ApiResult<impl IntoResponse> {
    let task = UpdateTaskService::new(&state.ctx, &user).call(id, input).await?;
    Ok(Envelope::data(task))
}

/// DELETE /api/tasks/:id
pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    DeleteTaskService::new(&state.ctx, &user).call(id).await?;
    Ok(empty())
}

/// POST /api/tasks/:id/comments
pub async fn add_comment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    JsonBody(input): JsonBody<CreateComment>,
) -> ApiResult<impl IntoResponse> {
    let task = AddCommentService::new(&state.ctx, &user).call(id, input).await?;
    Ok((StatusCode::CREATED, Envelope::data(task)))
}
