//! Task model
//!
//! Collection: tasks
//!
//! A task embeds its comment thread and its append-only change history.

use chrono::{DateTime, NaiveDate, Utc};
use ph_core::traits::Id;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::dates;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Done => "done",
        }
    }

    /// Human label, e.g. `in progress`
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Task,
    Bug,
    Feature,
}

/// File linked directly to a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAttachment {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default = "Utc::now")]
    pub uploaded_at: DateTime<Utc>,
}

/// Comment on a task; replies reference their parent comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Id,
    pub user: Id,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_comment: Option<Id>,
    #[serde(default)]
    pub mentions: Vec<Id>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Updated,
    StatusChange,
    Commented,
}

/// Immutable audit record of a task change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub user: Id,
    pub action: HistoryAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default)]
    pub old_value: JsonValue,
    #[serde(default)]
    pub new_value: JsonValue,
    pub timestamp: DateTime<Utc>,
}

/// Task entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Id,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub project: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<Id>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub assignees: Vec<Id>,
    pub reporter: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub actual_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task: Option<Id>,
    #[serde(default)]
    pub dependencies: Vec<Id>,
    #[serde(default)]
    pub attachments: Vec<TaskAttachment>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub order: i64,
    pub created_at: DateTime<Utc>,
}

document!(Task, "tasks", "Task");

impl Task {
    /// Build a new task from a creation payload
    pub fn from_input(input: CreateTask, reporter: Id) -> Self {
        Self {
            id: ph_core::traits::new_id(),
            title: input.title.trim().to_string(),
            description: input.description,
            project: input.project,
            milestone: input.milestone,
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            task_type: input.task_type.unwrap_or_default(),
            assignees: input.assignees,
            reporter,
            due_date: input.due_date,
            estimated_hours: input.estimated_hours,
            actual_hours: input.actual_hours.unwrap_or(0.0),
            parent_task: input.parent_task,
            dependencies: input.dependencies,
            attachments: vec![],
            comments: vec![],
            history: vec![],
            tags: input.tags,
            order: input.order.unwrap_or(0),
            created_at: Utc::now(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    /// Not done and due strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_done() && self.due_date.map_or(false, |due| due < today)
    }

    pub fn find_comment(&self, id: Id) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }
}

/// Task creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please add a task title"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub project: Id,
    #[serde(default)]
    pub milestone: Option<Id>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(rename = "type", default)]
    pub task_type: Option<TaskType>,
    #[serde(default)]
    pub assignees: Vec<Id>,
    #[serde(default, deserialize_with = "dates::lenient_option")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Estimated hours cannot be negative"))]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Actual hours cannot be negative"))]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub parent_task: Option<Id>,
    #[serde(default)]
    pub dependencies: Vec<Id>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

/// Task update payload; absent fields are left unchanged and `null` clears
/// an optional field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[validate(length(min = 1, message = "Please add a task title"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "dates::nullable")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    #[serde(default, deserialize_with = "dates::nullable_date")]
    pub due_date: Option<Option<NaiveDate>>,
    pub assignees: Option<Vec<Id>>,
    #[serde(default, deserialize_with = "dates::nullable")]
    pub milestone: Option<Option<Id>>,
    #[serde(default, deserialize_with = "dates::nullable")]
    pub estimated_hours: Option<Option<f64>>,
    #[validate(range(min = 0.0, message = "Actual hours cannot be negative"))]
    pub actual_hours: Option<f64>,
    #[serde(default, deserialize_with = "dates::nullable")]
    pub parent_task: Option<Option<Id>>,
    pub dependencies: Option<Vec<Id>>,
    pub attachments: Option<Vec<TaskAttachment>>,
    pub tags: Option<Vec<String>>,
    pub order: Option<i64>,
}

impl UpdateTask {
    /// Apply every submitted field to `task`
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(task_type) = self.task_type {
            task.task_type = task_type;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(assignees) = &self.assignees {
            task.assignees = assignees.clone();
        }
        if let Some(milestone) = self.milestone {
            task.milestone = milestone;
        }
        if let Some(estimated_hours) = self.estimated_hours {
            task.estimated_hours = estimated_hours;
        }
        if let Some(actual_hours) = self.actual_hours {
            task.actual_hours = actual_hours;
        }
        if let Some(parent_task) = self.parent_task {
            task.parent_task = parent_task;
        }
        if let Some(dependencies) = &self.dependencies {
            task.dependencies = dependencies.clone();
        }
        if let Some(attachments) = &self.attachments {
            task.attachments = attachments.clone();
        }
        if let Some(tags) = &self.tags {
            task.tags = tags.clone();
        }
        if let Some(order) = self.order {
            task.order = order;
        }
    }
}

/// Comment payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please add comment text"))]
    pub text: String,
    #[serde(default)]
    pub parent_comment: Option<Id>,
}
