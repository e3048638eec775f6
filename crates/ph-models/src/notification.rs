//! Notification model
//!
//! Collection: notifications

use chrono::{DateTime, Utc};
use ph_core::traits::Id;
use serde::{Deserialize, Serialize};

/// Notification type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// User was assigned to a task
    TaskAssignment,
    /// User was mentioned in a comment
    Mention,
    /// A task passed its due date
    OverdueAlert,
    /// Something changed in a project the user participates in
    ProjectUpdate,
    /// Someone replied to the user's comment
    CommentReply,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskAssignment => "task_assignment",
            Self::Mention => "mention",
            Self::OverdueAlert => "overdue_alert",
            Self::ProjectUpdate => "project_update",
            Self::CommentReply => "comment_reply",
        }
    }
}

/// A notification addressed to a single user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Id,
    pub recipient: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Id>,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

document!(Notification, "notifications", "Notification");

impl Notification {
    /// Create a new unread notification
    pub fn new(
        recipient: Id,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: ph_core::traits::new_id(),
            recipient,
            sender: None,
            notification_type,
            title: title.into(),
            message: message.into(),
            link: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Set the sender
    pub fn with_sender(mut self, sender: Id) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Set the link
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}
