//! Notification handlers

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use ph_core::traits::Id;
use ph_services::NotificationService;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, Envelope};

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let inbox = NotificationService::new(&state.ctx, &user).list().await?;
    Ok(Envelope::list(inbox))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let count = NotificationService::new(&state.ctx, &user).unread_count().await?;
    Ok(Envelope::data(count))
}

/// PUT /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    let notification = NotificationService::new(&state.ctx, &user).mark_read(id).await?;
    Ok(Envelope::data(notification))
}

/// PUT /api/notifications/mark-all-read
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    NotificationService::new(&state.ctx, &user).mark_all_read().await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "All notifications marked as read"
    })))
}
