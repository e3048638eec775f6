//! File handlers
//!
//! `POST /api/files` records a file hosted elsewhere; `POST
//! /api/files/upload` takes a multipart form with a `file` part and a
//! `project` field and stores the content locally.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use ph_attachments::Upload;
use ph_core::{traits::Id, PhError};
use ph_models::CreateFileRecord;
use ph_services::FileService;

use super::ProjectQuery;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{empty, AppState, AuthenticatedUser, Envelope, JsonBody, QueryParams};

/// GET /api/files?projectId=
pub async fn list_files(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    QueryParams(query): QueryParams<ProjectQuery>,
) -> ApiResult<impl IntoResponse> {
    let files = FileService::new(&state.ctx, &user, &state.uploader)
        .list(query.project_id)
        .await?;
    Ok(Envelope::list(files))
}

/// POST /api/files
pub async fn create_file(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(input): JsonBody<CreateFileRecord>,
) -> ApiResult<impl IntoResponse> {
    let file = FileService::new(&state.ctx, &user, &state.uploader)
        .create(input)
        .await?;
    Ok((StatusCode::CREATED, Envelope::data(file)))
}

/// POST /api/files/upload
pub async fn upload_file(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut project: Option<Id> = None;
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                let mut part = Upload::new(name, data);
                if let Some(content_type) = content_type {
                    part = part.with_content_type(content_type);
                }
                upload = Some(part);
            }
            Some("project") | Some("projectId") => {
                let value = field.text().await.map_err(multipart_error)?;
                let id = value
                    .trim()
                    .parse()
                    .map_err(|_| ApiError::bad_request("Invalid project id"))?;
                project = Some(id);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("Please upload a file"))?;
    let file = FileService::new(&state.ctx, &user, &state.uploader)
        .upload(project, upload)
        .await?;
    Ok((StatusCode::CREATED, Envelope::data(file)))
}

/// DELETE /api/files/:id
pub async fn delete_file(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Id>,
) -> ApiResult<impl IntoResponse> {
    FileService::new(&state.ctx, &user, &state.uploader)
        .delete(id)
        .await?;
    Ok(empty())
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError(PhError::PayloadTooLarge {
            message: err.body_text(),
        })
    } else {
        ApiError::bad_request(err.body_text())
    }
}
