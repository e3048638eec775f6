//! Timesheet handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use ph_models::CreateTimesheet;
use ph_services::TimesheetService;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser, Envelope, JsonBody};

/// GET /api/timesheets
pub async fn list_timesheets(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let entries = TimesheetService::new(&state.ctx, &user).list().await?;
    Ok(Envelope::list(entries))
}

/// POST /api/timesheets
pub async fn create_timesheet(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(input): JsonBody<CreateTimesheet>,
) -> ApiResult<impl IntoResponse> {
    let entry = TimesheetService::new(&state.ctx, &user).create(input).await?;
    Ok((StatusCode::CREATED, Envelope::data(entry)))
}

/// GET /api/timesheets/export
pub async fn export_timesheets(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let export = TimesheetService::new(&state.ctx, &user).export().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.body,
    ))
}
