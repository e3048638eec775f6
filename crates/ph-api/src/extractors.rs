//! Axum extractors and response wrappers for API handlers

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequest, FromRequestParts},
    http::{header, request::Parts},
    Json,
};
use ph_attachments::{Storage, Uploader};
use ph_auth::{resolve_token, CookieConfig, CurrentUser, JwtService, RequestHeaders};
use ph_core::config::AppConfig;
use ph_services::{AuthService, ServiceContext};
use serde::Serialize;

use crate::error::ApiError;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub ctx: ServiceContext,
    pub jwt: Arc<JwtService>,
    pub cookie: Arc<CookieConfig>,
    pub uploader: Arc<Uploader>,
}

impl AppState {
    pub fn new(ctx: ServiceContext, config: &AppConfig, storage: Arc<dyn Storage>) -> Self {
        Self {
            ctx,
            jwt: Arc::new(JwtService::from_config(&config.auth)),
            cookie: Arc::new(CookieConfig::from_config(&config.auth)),
            uploader: Arc::new(Uploader::new(storage, config.storage.max_upload_size)),
        }
    }
}

/// The caller, resolved from the bearer token or the `token` cookie
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let header_value = |name: header::HeaderName| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let headers = RequestHeaders {
            authorization: header_value(header::AUTHORIZATION),
            cookie: header_value(header::COOKIE),
        };

        let (token, _) = resolve_token(&headers)?;
        let user = AuthService::new(&app_state.ctx, &app_state.jwt)
            .authenticate(token)
            .await?;
        Ok(AuthenticatedUser(user))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// JSON request body; malformed bodies are answered with 400
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query string; malformed parameters are answered with 400
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Success envelope: `{success: true, count?, data}`
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            count: None,
            data,
        })
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// A collection with its element count
    pub fn list(data: Vec<T>) -> Json<Self> {
        Json(Self {
            success: true,
            count: Some(data.len()),
            data,
        })
    }
}

/// `{success: true, data: {}}`, the answer to deletions
pub fn empty() -> Json<Envelope<serde_json::Value>> {
    Envelope::data(serde_json::json!({}))
}
