//! # ph-auth
//!
//! Authentication and authorization for ProjectHub.
//!
//! ## Features
//!
//! - JWT issue and validation
//! - Argon2 password hashing
//! - Token resolution from the `Authorization` header or the `token` cookie
//! - Role allow-lists checked per route

pub mod cookie;
pub mod jwt;
pub mod password;
pub mod permissions;
pub mod token;

pub use cookie::{extract_cookie, CookieConfig, SameSite, TOKEN_COOKIE};
pub use jwt::{extract_bearer_token, Claims, JwtError, JwtService};
pub use password::{hash_password, verify_password, PasswordError};
pub use permissions::{allow, authorize, CurrentUser};
pub use token::{resolve_token, AuthError, RequestHeaders, TokenSource};
