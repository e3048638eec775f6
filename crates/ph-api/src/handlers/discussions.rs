//! Discussion handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use ph_models::CreateDiscussion;
use ph_services::DiscussionService;

use super::ProjectQuery;
use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, Envelope, JsonBody, QueryParams};

/// GET /api/discussions?projectId=
pub async fn list_discussions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    QueryParams(query): QueryParams<ProjectQuery>,
) -> ApiResult<impl IntoResponse> {
    let messages = DiscussionService::new(&state.ctx, &user)
        .list(query.project_id)
        .await?;
    Ok(Envelope::list(messages))
}

/// POST /api/discussions
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(input): JsonBody<CreateDiscussion>,
) -> ApiResult<impl IntoResponse> {
    let message = DiscussionService::new(&state.ctx, &user).send(input).await?;
    Ok((StatusCode::CREATED, Envelope::data(message)))
}
