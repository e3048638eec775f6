//! Request token resolution
//!
//! The bearer header wins over the `token` cookie. Resolution only locates
//! the token; validation and the user lookup happen in the API extractor.

use ph_core::PhError;
use thiserror::Error;

use crate::cookie::{extract_cookie, TOKEN_COOKIE};
use crate::jwt::{extract_bearer_token, JwtError};

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not authorized, no token")]
    Required,
    #[error("Not authorized, token failed")]
    InvalidToken,
    #[error("Not authorized, token expired")]
    TokenExpired,
    #[error("Not authorized, no user found")]
    UnknownUser,
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::TokenExpired,
            JwtError::Missing => AuthError::Required,
            JwtError::Invalid(_) | JwtError::EncodingFailed(_) => AuthError::InvalidToken,
        }
    }
}

impl From<AuthError> for PhError {
    fn from(err: AuthError) -> Self {
        PhError::unauthorized(err.to_string())
    }
}

/// Where a token was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Cookie,
}

/// The request headers relevant to authentication
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    pub authorization: Option<String>,
    pub cookie: Option<String>,
}

impl RequestHeaders {
    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    pub fn with_cookie(mut self, value: impl Into<String>) -> Self {
        self.cookie = Some(value.into());
        self
    }
}

/// Locate the request token: `Authorization: Bearer` first, then the
/// `token` cookie.
pub fn resolve_token(headers: &RequestHeaders) -> Result<(&str, TokenSource), AuthError> {
    if let Some(token) = headers
        .authorization
        .as_deref()
        .and_then(extract_bearer_token)
    {
        return Ok((token, TokenSource::Header));
    }

    headers
        .cookie
        .as_deref()
        .and_then(|cookie| extract_cookie(cookie, TOKEN_COOKIE))
        .map(|token| (token, TokenSource::Cookie))
        .ok_or(AuthError::Required)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_takes_precedence() {
        let headers = RequestHeaders::default()
            .with_authorization("Bearer from-header")
            .with_cookie("token=from-cookie");

        assert_eq!(
            resolve_token(&headers).unwrap(),
            ("from-header", TokenSource::Header)
        );
    }

    #[test]
    fn test_cookie_fallback() {
        let headers = RequestHeaders::default()
            .with_authorization("Basic dXNlcjpwYXNz")
            .with_cookie("theme=dark; token=from-cookie");

        assert_eq!(
            resolve_token(&headers).unwrap(),
            ("from-cookie", TokenSource::Cookie)
        );
    }

    #[test]
    fn test_missing_token() {
        let err = resolve_token(&RequestHeaders::default()).unwrap_err();
        assert!(matches!(err, AuthError::Required));

        let err: PhError = err.into();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.client_message(), "Not authorized, no token");
    }

    #[test]
    fn test_jwt_error_mapping() {
        assert!(matches!(AuthError::from(JwtError::Expired), AuthError::TokenExpired));
        assert!(matches!(
            AuthError::from(JwtError::Invalid("bad".into())),
            AuthError::InvalidToken
        ));
    }
}
