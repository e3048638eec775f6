//! API request handlers, one module per resource

pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod discussions;
pub mod files;
pub mod milestones;
pub mod notifications;
pub mod projects;
pub mod tasks;
pub mod timesheets;
pub mod users;

use ph_core::traits::Id;
use serde::Deserialize;

/// `?projectId=` selector shared by file and discussion listings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectQuery {
    #[serde(default)]
    pub project_id: Option<Id>,
}
