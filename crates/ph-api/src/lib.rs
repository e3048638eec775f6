//! # ph-api
//!
//! JSON REST handlers for ProjectHub.
//!
//! Every route lives under `/api`. Successful responses use the
//! `{success: true, count?, data}` envelope, failures `{success: false,
//! message}`.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::{AppState, AuthenticatedUser};
pub use routes::router;
