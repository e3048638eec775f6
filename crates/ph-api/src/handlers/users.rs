//! User handlers

use axum::{extract::State, response::IntoResponse};
use ph_services::UserService;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, Envelope};

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Envelope::list(UserService::new(&state.ctx).list().await?))
}
