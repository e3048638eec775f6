//! JWT Authentication
//!
//! Tokens carry the user id as `sub`. Nothing else in the claims is trusted;
//! the user is reloaded from the store on every request.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use ph_core::traits::Id;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// JWT ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Missing token")]
    Missing,
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

/// JWT service for creating and validating tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in_seconds: i64,
}

impl JwtService {
    /// Create a new JWT service with the given secret and token lifetime
    pub fn new(secret: &[u8], expires_in_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expires_in_seconds: i64::try_from(expires_in_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Create from the auth section of the application config
    pub fn from_config(config: &ph_core::config::AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.token_expiration_seconds)
    }

    pub fn expires_in_seconds(&self) -> i64 {
        self.expires_in_seconds
    }

    /// Create a new JWT token for a user
    pub fn create_token(&self, user_id: Id) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(Duration::seconds(self.expires_in_seconds))
            .ok_or_else(|| JwtError::EncodingFailed("expiry out of range".to_string()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
            jti: Some(uuid::Uuid::new_v4().to_string()),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                    _ => JwtError::Invalid(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Extract user ID from a validated token
    pub fn get_user_id(&self, token: &str) -> Result<Id, JwtError> {
        let claims = self.validate_token(token)?;
        claims
            .sub
            .parse()
            .map_err(|_| JwtError::Invalid("Invalid user ID in token".to_string()))
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    let prefix = authorization.get(..7)?;
    if prefix.eq_ignore_ascii_case("bearer ") {
        Some(authorization[7..].trim()).filter(|token| !token.is_empty())
    } else {
        None
    }
}
