//! Analytics handlers

use axum::{extract::State, response::IntoResponse};
use ph_services::AnalyticsService;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, Envelope};

/// GET /api/analytics/projects
pub async fn projects(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Envelope::data(AnalyticsService::new(&state.ctx, &user).projects().await?))
}

/// GET /api/analytics/tasks
pub async fn tasks(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Envelope::data(AnalyticsService::new(&state.ctx, &user).tasks().await?))
}

/// GET /api/analytics/time
pub async fn time(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Envelope::data(AnalyticsService::new(&state.ctx, &user).time().await?))
}

/// GET /api/analytics/overdue
pub async fn overdue(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Envelope::data(AnalyticsService::new(&state.ctx, &user).overdue().await?))
}
