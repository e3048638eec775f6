//! Milestone model
//!
//! Collection: milestones

use chrono::{DateTime, NaiveDate, Utc};
use ph_core::traits::Id;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
    Overdue,
}

impl MilestoneStatus {
    /// Upcoming or active
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Upcoming | Self::Active)
    }
}

/// Milestone entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Id,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub project: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: MilestoneStatus,
    pub created_at: DateTime<Utc>,
}

document!(Milestone, "milestones", "Milestone");

impl Milestone {
    pub fn new(project: Id, input: CreateMilestone) -> Self {
        Self {
            id: ph_core::traits::new_id(),
            title: input.title.trim().to_string(),
            description: input.description,
            project,
            due_date: input.due_date,
            status: input.status.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestone {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please add a milestone title"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "dates::lenient_option")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<MilestoneStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMilestone {
    #[validate(length(min = 1, message = "Please add a milestone title"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "dates::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "dates::nullable_date")]
    pub due_date: Option<Option<NaiveDate>>,
    pub status: Option<MilestoneStatus>,
}

impl UpdateMilestone {
    pub fn apply_to(&self, milestone: &mut Milestone) {
        if let Some(title) = &self.title {
            milestone.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            milestone.description = description.clone();
        }
        if let Some(due_date) = self.due_date {
            milestone.due_date = due_date;
        }
        if let Some(status) = self.status {
            milestone.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_milestone() {
        let input: CreateMilestone = serde_json::from_value(serde_json::json!({
            "title": "Beta",
            "dueDate": "2024-06-01"
        }))
        .unwrap();
        let mut milestone = Milestone::new(ph_core::traits::new_id(), input);
        assert_eq!(milestone.status, MilestoneStatus::Upcoming);
        assert!(milestone.status.is_pending());

        let patch: UpdateMilestone =
            serde_json::from_str(r#"{"status": "completed", "dueDate": null}"#).unwrap();
        patch.apply_to(&mut milestone);

        assert_eq!(milestone.status, MilestoneStatus::Completed);
        assert_eq!(milestone.due_date, None);
        assert_eq!(milestone.title, "Beta");
    }
}
