//! Authentication handlers

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use ph_models::{LoginUser, RegisterUser};
use ph_services::{AuthService, AuthSession, UserProfile};
use serde::Serialize;

use crate::error::ApiResult;
use crate::extractors::{empty, AppState, AuthenticatedUser, Envelope, JsonBody};

#[derive(Serialize)]
struct TokenResponse {
    success: bool,
    token: String,
    user: UserProfile,
}

/// Answer with the token in the body and in the `token` cookie
fn token_response(state: &AppState, session: AuthSession) -> Response {
    let cookie = state.cookie.build_cookie(&session.token);
    (
        [(header::SET_COOKIE, cookie)],
        Json(TokenResponse {
            success: true,
            token: session.token,
            user: session.user,
        }),
    )
        .into_response()
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterUser>,
) -> ApiResult<Response> {
    let session = AuthService::new(&state.ctx, &state.jwt).register(input).await?;
    Ok(token_response(&state, session))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginUser>,
) -> ApiResult<Response> {
    let session = AuthService::new(&state.ctx, &state.jwt).login(input).await?;
    Ok(token_response(&state, session))
}

/// GET /api/auth/logout
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, state.cookie.build_clear_cookie())],
        empty(),
    )
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<impl IntoResponse> {
    let me = AuthService::new(&state.ctx, &state.jwt).me(&user).await?;
    Ok(Envelope::data(me))
}
