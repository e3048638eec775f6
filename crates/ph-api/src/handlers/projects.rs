//! Project handlers
//!
//! Milestones and tasks of a project are also reachable below
//! `/api/projects/:id`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use ph_core::traits::Id;
use ph_models::{CreateProject, UpdateProject};
use ph_services::{ProjectService, TaskFilter, TaskQueryService};

use crate::error::ApiResult;
use crate::extractors::{empty, AppState, AuthenticatedUser, Envelope, JsonBody};

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let projects = ProjectService::new(&state.ctx, &user).list().await?;
    Ok(Envelope::list(projects))
}

/// GET /api/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let project = ProjectService::new(&state.ctx, &user).get(id).await?;
    Ok(Envelope::data(project))
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(input): JsonBody<CreateProject>,
) -> ApiResult<impl IntoResponse> {
    let project = ProjectService::new(&state.ctx, &user).create(input).await?;
    Ok((StatusCode::CREATED, Envelope::data(project)))
}

/// PUT /api/projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    JsonBody(input): JsonBody<UpdateProject>,
) -> ApiResult<impl IntoResponse> {
    let project = ProjectService::new(&state.ctx, &user).update(id, input).await?;
    Ok(Envelope::data(project))
}

/// DELETE /api/projects/:id
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    ProjectService::new(&state.ctx, &user).delete(id).await?;
    Ok(empty())
}

/// GET /api/projects/:id/tasks
pub async fn list_project_tasks(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let tasks = TaskQueryService::new(&state.ctx)
        .list(&TaskFilter::for_project(id))
        .await?;
    Ok(Envelope::list(tasks))
}
