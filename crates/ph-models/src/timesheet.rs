//! Timesheet model
//!
//! Collection: timesheets

use chrono::{DateTime, NaiveDate, Utc};
use ph_core::traits::Id;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dates;

/// Smallest loggable amount of time in hours
pub const MIN_HOURS: f64 = 0.25;
/// Largest loggable amount of time in hours
pub const MAX_HOURS: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimesheetStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl TimesheetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// A block of time logged by a user against a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    pub id: Id,
    pub user: Id,
    pub project: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Id>,
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_billable")]
    pub billable: bool,
    #[serde(default)]
    pub status: TimesheetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<Id>,
    pub created_at: DateTime<Utc>,
}

fn default_billable() -> bool {
    true
}

document!(Timesheet, "timesheets", "Timesheet");

impl Timesheet {
    pub fn new(user: Id, input: CreateTimesheet) -> Self {
        Self {
            id: ph_core::traits::new_id(),
            user,
            project: input.project,
            task: input.task,
            date: input.date,
            hours: input.hours,
            description: input.description,
            billable: input.billable.unwrap_or(true),
            status: input.status.unwrap_or_default(),
            approved_by: None,
            created_at: Utc::now(),
        }
    }
}

/// Time entry payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimesheet {
    pub project: Id,
    #[serde(default)]
    pub task: Option<Id>,
    #[serde(deserialize_with = "dates::lenient")]
    pub date: NaiveDate,
    #[validate(range(min = 0.25, max = 24.0, message = "Hours must be between 0.25 and 24"))]
    pub hours: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub billable: Option<bool>,
    #[serde(default)]
    pub status: Option<TimesheetStatus>,
}
