//! API error handling
//!
//! Wraps [`PhError`] and renders it as `{success: false, message}`. Server
//! side failures are logged and answered with a generic message.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ph_attachments::StorageError;
use ph_auth::AuthError;
use ph_core::PhError;
use serde::Serialize;

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub PhError);

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError(PhError::bad_request(msg))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        ApiError(PhError::unauthorized(msg))
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<PhError> for ApiError {
    fn from(err: PhError) -> Self {
        ApiError(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError(err.into())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.0.is_server_error() {
            tracing::error!(error = %self.0, code = self.0.error_code(), "request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }

        let body = ErrorBody {
            success: false,
            message: self.0.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
