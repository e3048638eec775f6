//! Dashboard handlers

use axum::{extract::State, response::IntoResponse};
use ph_services::DashboardService;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, Envelope};

/// GET /api/dashboard/admin
pub async fn admin(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Envelope::data(DashboardService::new(&state.ctx, &user).admin().await?))
}

/// GET /api/dashboard/pm
pub async fn pm(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Envelope::data(DashboardService::new(&state.ctx, &user).pm().await?))
}

/// GET /api/dashboard/member
pub async fn member(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Envelope::data(DashboardService::new(&state.ctx, &user).member().await?))
}
