//! Milestone handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use ph_core::traits::Id;
use ph_models::{CreateMilestone, UpdateMilestone};
use ph_services::MilestoneService;

use crate::error::ApiResult;
use crate::extractors::{empty, AppState, AuthenticatedUser, Envelope, JsonBody};

/// GET /api/projects/:id/milestones
pub async fn list_milestones(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(project): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let milestones = MilestoneService::new(&state.ctx, &user).list(project).await?;
    Ok(Envelope::list(milestones))
}

/// POST /api/projects/:id/milestones
pub async fn create_milestone(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(project): Path<Id>,
    JsonBody(input): JsonBody<CreateMilestone>,
) -> ApiResult<impl IntoResponse> {
    let milestone = MilestoneService::new(&state.ctx, &user)
        .create(project, input)
        .await?;
    Ok((StatusCode::CREATED, Envelope::data(milestone)))
}

/// GET /api/milestones/:id
pub async fn get_milestone(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let milestone = MilestoneService::new(&state.ctx, &user).get(id).await?;
    Ok(Envelope::data(milestone))
}

/// PUT /api/milestones/:id
pub async fn update_milestone(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
    JsonBody(input): JsonBody<UpdateMilestone>,
) -> ApiResult<impl IntoResponse> {
    let milestone = MilestoneService::new(&state.ctx, &user).update(id, input).await?;
    Ok(Envelope::data(milestone))
}

/// DELETE /api/milestones/:id
pub async fn delete_milestone(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    MilestoneService::new(&state.ctx, &user).delete(id).await?;
    Ok(empty())
}
