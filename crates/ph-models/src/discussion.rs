//! Project discussion messages
//!
//! Collection: discussions

use chrono::{DateTime, Utc};
use ph_core::traits::Id;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub id: Id,
    pub project: Id,
    pub sender: Id,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

document!(Discussion, "discussions", "Discussion");

impl Discussion {
    pub fn new(project: Id, sender: Id, content: impl Into<String>) -> Self {
        Self {
            id: ph_core::traits::new_id(),
            project,
            sender,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussion {
    pub project: Id,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please add message content"))]
    pub content: String,
}
