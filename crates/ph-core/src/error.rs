//! Core error types for ProjectHub
//!
//! Every layer below the HTTP surface reports failures through [`PhError`].
//! The API crate maps each variant onto a status code and a
//! `{success: false, message}` body.

use std::collections::BTreeMap;
use thiserror::Error;

/// Core error type for all ProjectHub operations
#[derive(Error, Debug)]
pub enum PhError {
    #[error("{entity} not found")]
    NotFound {
        entity: &'static str,
        id: String,
        /// Overrides the default `"<entity> not found"` message.
        message: Option<String>,
    },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Contract(#[from] ContractError),

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    PayloadTooLarge { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PhError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        PhError::NotFound {
            entity,
            id: id.to_string(),
            message: None,
        }
    }

    /// Not-found error carrying a caller supplied message
    pub fn not_found_with(
        entity: &'static str,
        id: impl std::fmt::Display,
        message: impl Into<String>,
    ) -> Self {
        PhError::NotFound {
            entity,
            id: id.to_string(),
            message: Some(message.into()),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        PhError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        PhError::Forbidden {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        PhError::BadRequest {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PhError::Conflict {
            message: message.into(),
        }
    }

    /// Business-rule violation with a client-facing message
    pub fn rule(message: impl Into<String>) -> Self {
        PhError::Contract(ContractError::Base {
            message: message.into(),
        })
    }

    pub fn status_code(&self) -> u16 {
        match self {
            PhError::NotFound { .. } => 404,
            PhError::Unauthorized { .. } => 401,
            PhError::Forbidden { .. } => 403,
            PhError::Validation(_) | PhError::Contract(_) | PhError::BadRequest { .. } => 400,
            PhError::PayloadTooLarge { .. } => 413,
            PhError::Conflict { .. } => 409,
            PhError::Database(_) | PhError::Internal(_) | PhError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PhError::NotFound { .. } => "not_found",
            PhError::Unauthorized { .. } => "unauthorized",
            PhError::Forbidden { .. } => "forbidden",
            PhError::Validation(_) => "validation_failed",
            PhError::Contract(_) => "contract_violated",
            PhError::BadRequest { .. } => "bad_request",
            PhError::PayloadTooLarge { .. } => "payload_too_large",
            PhError::Conflict { .. } => "conflict",
            PhError::Database(_) => "database_error",
            PhError::Internal(_) => "internal_error",
            PhError::Config(_) => "configuration_error",
        }
    }

    /// Message safe to show to API clients
    pub fn client_message(&self) -> String {
        match self {
            PhError::NotFound {
                message: Some(message),
                ..
            } => message.clone(),
            PhError::Validation(errors) => errors.full_messages().join(", "),
            PhError::Database(_) | PhError::Internal(_) | PhError::Config(_) => {
                "Server Error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// True for failures that are the server's fault
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

/// Validation errors collection, keyed by field
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> messages
    pub errors: BTreeMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    /// Messages are written as complete sentences, so no field prefix is added.
    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for field_messages in self.errors.values() {
            messages.extend(field_messages.iter().cloned());
        }
        messages
    }

    /// `Ok(())` when empty, otherwise the collected errors
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(source: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, field_errors) in source.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, error.code));
                errors.add(field.to_string(), message);
            }
        }
        errors
    }
}

impl From<validator::ValidationErrors> for PhError {
    fn from(source: validator::ValidationErrors) -> Self {
        PhError::Validation(source.into())
    }
}

/// Business-rule violation raised by contracts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    #[error("{attribute} {message}")]
    AttributeInvalid { attribute: String, message: String },

    #[error("{message}")]
    Base { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PhError::not_found("Task", "1").status_code(), 404);
        assert_eq!(PhError::forbidden("no").status_code(), 403);
        assert_eq!(PhError::unauthorized("no").status_code(), 401);
        assert_eq!(PhError::rule("blocked").status_code(), 400);
        assert_eq!(PhError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(
            PhError::not_found("Task", "abc").client_message(),
            "Task not found"
        );
        assert_eq!(
            PhError::not_found_with("Project", "abc", "Project not found with id of abc")
                .client_message(),
            "Project not found with id of abc"
        );
        assert_eq!(PhError::rule("Cannot start task.").client_message(), "Cannot start task.");
        assert_eq!(
            PhError::Database("connection refused".into()).client_message(),
            "Server Error"
        );
    }

    #[test]
    fn test_validation_errors_merge() {
        let mut a = ValidationErrors::new();
        a.add("title", "Please add a task title");
        let mut b = ValidationErrors::new();
        b.add_base("Something else");
        a.merge(b);

        assert!(a.has_error("title"));
        assert_eq!(
            a.full_messages(),
            vec!["Something else".to_string(), "Please add a task title".to_string()]
        );
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
