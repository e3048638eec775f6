//! Project model
//!
//! Collection: projects

use chrono::{DateTime, NaiveDate, Utc};
use ph_core::traits::Id;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Active => "active",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Id,
    pub title: String,
    pub description: String,
    /// Short uppercase key, e.g. `WEB`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub priority: ProjectPriority,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    pub manager: Id,
    #[serde(default)]
    pub members: Vec<Id>,
    pub organization: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

document!(Project, "projects", "Project");

impl Project {
    /// Build a new project managed by `manager` within `organization`
    pub fn new(input: CreateProject, manager: Id, organization: Id) -> Self {
        Self {
            id: ph_core::traits::new_id(),
            title: input.title.trim().to_string(),
            description: input.description,
            key: normalize_key(input.key.as_deref()),
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            start_date: input.start_date.unwrap_or_else(|| Utc::now().date_naive()),
            end_date: input.end_date,
            budget: input.budget,
            manager,
            members: input.members,
            organization,
            category: input.category,
            tags: input.tags,
            created_at: Utc::now(),
        }
    }

    pub fn is_manager(&self, user: Id) -> bool {
        self.manager == user
    }

    pub fn is_member(&self, user: Id) -> bool {
        self.members.contains(&user)
    }

    /// Manager plus members, without duplicates
    pub fn participants(&self) -> Vec<Id> {
        let mut ids = vec![self.manager];
        for member in &self.members {
            if !ids.contains(member) {
                ids.push(*member);
            }
        }
        ids
    }
}

/// Normalize a project key: trimmed and uppercased, empty becomes `None`
pub fn normalize_key(key: Option<&str>) -> Option<String> {
    key.map(|k| k.trim().to_uppercase()).filter(|k| !k.is_empty())
}

/// Project creation payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please add a project title"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub priority: Option<ProjectPriority>,
    #[serde(default, deserialize_with = "dates::lenient_option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::lenient_option")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Budget cannot be negative"))]
    pub budget: Option<f64>,
    #[serde(default)]
    pub members: Vec<Id>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Project update payload; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[validate(length(min = 1, message = "Please add a project title"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "dates::nullable")]
    pub key: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    #[serde(default, deserialize_with = "dates::lenient_option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "dates::nullable_date")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "dates::nullable")]
    pub budget: Option<Option<f64>>,
    pub members: Option<Vec<Id>>,
    #[serde(default, deserialize_with = "dates::nullable")]
    pub category: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl UpdateProject {
    /// Apply every submitted field to `project`
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(title) = &self.title {
            project.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(key) = &self.key {
            project.key = normalize_key(key.as_deref());
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(priority) = self.priority {
            project.priority = priority;
        }
        if let Some(start_date) = self.start_date {
            project.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            project.end_date = end_date;
        }
        if let Some(budget) = self.budget {
            project.budget = budget;
        }
        if let Some(members) = &self.members {
            project.members = members.clone();
        }
        if let Some(category) = &self.category {
            project.category = category.clone();
        }
        if let Some(tags) = &self.tags {
            project.tags = tags.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_defaults() {
        let input: CreateProject = serde_json::from_value(serde_json::json!({
            "title": " Site ",
            "description": "Rebuild",
            "key": " web "
        }))
        .unwrap();
        let manager = ph_core::traits::new_id();
        let project = Project::new(input, manager, ph_core::traits::new_id());

        assert_eq!(project.title, "Site");
        assert_eq!(project.key.as_deref(), Some("WEB"));
        assert_eq!(project.status, ProjectStatus::Planning);
        assert_eq!(project.priority, ProjectPriority::Medium);
        assert_eq!(project.start_date, Utc::now().date_naive());
        assert!(project.is_manager(manager));
    }

    #[test]
    fn test_update_clears_nullable_fields() {
        let input: CreateProject = serde_json::from_value(serde_json::json!({
            "title": "Site",
            "description": "Rebuild",
            "budget": 100.0,
            "category": "web"
        }))
        .unwrap();
        let mut project = Project::new(input, ph_core::traits::new_id(), ph_core::traits::new_id());

        let patch: UpdateProject = serde_json::from_value(serde_json::json!({
            "budget": null,
            "status": "active"
        }))
        .unwrap();
        patch.apply_to(&mut project);

        assert_eq!(project.budget, None);
        assert_eq!(project.category.as_deref(), Some("web"));
        assert_eq!(project.status, ProjectStatus::Active);
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(Some(" web ")), Some("WEB".to_string()));
        assert_eq!(normalize_key(Some("   ")), None);
        assert_eq!(normalize_key(None), None);
    }

    #[test]
    fn test_create_project_requires_title_and_description() {
        let input: CreateProject = serde_json::from_str("{}").unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_participants_deduplicates_manager() {
        let manager = ph_core::traits::new_id();
        let other = ph_core::traits::new_id();
        let project = Project {
            id: ph_core::traits::new_id(),
            title: "Site".into(),
            description: "Rebuild".into(),
            key: None,
            status: ProjectStatus::Active,
            priority: ProjectPriority::High,
            start_date: Utc::now().date_naive(),
            end_date: None,
            budget: None,
            manager,
            members: vec![manager, other],
            organization: ph_core::traits::new_id(),
            category: None,
            tags: vec![],
            created_at: Utc::now(),
        };
        assert_eq!(project.participants(), vec![manager, other]);
        assert!(project.is_member(other));
        assert!(project.is_manager(manager));
    }
}
