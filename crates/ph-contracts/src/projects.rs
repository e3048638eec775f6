//! Project contract

use once_cell::sync::Lazy;
use ph_core::error::ValidationErrors;
use ph_models::Project;
use regex::Regex;

use crate::base::{require_present, Contract, ValidationResult};

static KEY_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Z0-9_]{0,9}$").expect("project key pattern is valid")
});

/// Field rules for a project document
#[derive(Debug, Default)]
pub struct ProjectContract;

impl ProjectContract {
    fn validate_key(&self, key: Option<&str>, errors: &mut ValidationErrors) {
        if let Some(key) = key {
            if !KEY_FORMAT.is_match(key) {
                errors.add(
                    "key",
                    "Key must start with a letter and contain at most 10 letters, digits or underscores",
                );
            }
        }
    }
}

impl Contract<Project> for ProjectContract {
    fn validate(&self, project: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        require_present(&mut errors, "title", &project.title, "Please add a project title");
        require_present(
            &mut errors,
            "description",
            &project.description,
            "Please add a description",
        );
        self.validate_key(project.key.as_deref(), &mut errors);

        if project.budget.map_or(false, |b| b < 0.0) {
            errors.add("budget", "Budget cannot be negative");
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ph_core::traits::new_id;
    use ph_models::{ProjectPriority, ProjectStatus};

    fn project() -> Project {
        Project {
            id: new_id(),
            title: "Website".into(),
            description: "Relaunch".into(),
            key: Some("WEB".into()),
            status: ProjectStatus::Planning,
            priority: ProjectPriority::Medium,
            start_date: Utc::now().date_naive(),
            end_date: None,
            budget: Some(1000.0),
            manager: new_id(),
            members: vec![],
            organization: new_id(),
            category: None,
            tags: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_project() {
        assert!(ProjectContract.validate(&project()).is_ok());
    }

    #[test]
    fn test_invalid_key_and_blank_title() {
        let mut p = project();
        p.title = " ".into();
        p.key = Some("1WEB".into());
        p.budget = Some(-5.0);

        let errors = ProjectContract.validate(&p).unwrap_err();
        assert!(errors.has_error("title"));
        assert!(errors.has_error("key"));
        assert!(errors.has_error("budget"));
    }

    #[test]
    fn test_key_format() {
        assert!(KEY_FORMAT.is_match("WEB"));
        assert!(KEY_FORMAT.is_match("APP_2"));
        assert!(!KEY_FORMAT.is_match("web"));
        assert!(!KEY_FORMAT.is_match("TOOLONGKEY12"));
    }
}
