//! Base contract system

use ph_core::error::ValidationErrors;

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Validates an entity before it is written
pub trait Contract<T>: Send + Sync {
    fn validate(&self, entity: &T) -> ValidationResult;
}

/// Run the declarative `validator` rules of a request payload
pub fn validate_input<T: validator::Validate>(input: &T) -> ValidationResult {
    input.validate().map_err(ValidationErrors::from)
}

/// Add a blank-field error unless `value` has visible characters
pub fn require_present(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    message: &str,
) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_models::RegisterUser;

    #[test]
    fn test_validate_input_collects_messages() {
        let input = RegisterUser {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "123".into(),
            organization_name: None,
        };
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some(&vec!["Password must be at least 6 characters".to_string()])
        );
    }

    #[test]
    fn test_require_present() {
        let mut errors = ValidationErrors::new();
        require_present(&mut errors, "title", "   ", "Please add a title");
        require_present(&mut errors, "name", "Ada", "Please add a name");
        assert!(errors.has_error("title"));
        assert!(!errors.has_error("name"));
    }
}
