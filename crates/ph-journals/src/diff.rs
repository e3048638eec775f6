//! Task diffs and the history entries derived from them

use chrono::{DateTime, Utc};
use ph_core::traits::Id;
use ph_models::{HistoryAction, HistoryEntry, Task};
use serde_json::Value as JsonValue;

use crate::fields::TrackedField;

/// One tracked field with its value before and after an update
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: TrackedField,
    pub old_value: JsonValue,
    pub new_value: JsonValue,
}

/// Changes between two versions of a task, in watch-list order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDiff {
    pub changes: Vec<FieldChange>,
}

impl TaskDiff {
    /// Compare the tracked fields of two task versions. An absent field is
    /// treated as `null`.
    pub fn compute(before: &Task, after: &Task) -> Result<Self, serde_json::Error> {
        let old = serde_json::to_value(before)?;
        let new = serde_json::to_value(after)?;

        let changes = TrackedField::ALL
            .iter()
            .filter_map(|field| {
                let old_value = old.get(field.as_str()).cloned().unwrap_or(JsonValue::Null);
                let new_value = new.get(field.as_str()).cloned().unwrap_or(JsonValue::Null);
                (old_value != new_value).then(|| FieldChange {
                    field: *field,
                    old_value,
                    new_value,
                })
            })
            .collect();

        Ok(Self { changes })
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if a specific field changed
    pub fn changed(&self, field: TrackedField) -> bool {
        self.changes.iter().any(|c| c.field == field)
    }

    /// One history entry per change; the status entry is labelled
    /// `status_change`, every other one `updated`.
    pub fn into_history(self, actor: Id, timestamp: DateTime<Utc>) -> Vec<HistoryEntry> {
        self.changes
            .into_iter()
            .map(|change| HistoryEntry {
                user: actor,
                action: if change.field == TrackedField::Status {
                    HistoryAction::StatusChange
                } else {
                    HistoryAction::Updated
                },
                field: Some(change.field.as_str().to_string()),
                old_value: change.old_value,
                new_value: change.new_value,
                timestamp,
            })
            .collect()
    }
}

/// History entry recording a new comment
pub fn comment_entry(actor: Id, text: &str, timestamp: DateTime<Utc>) -> HistoryEntry {
    HistoryEntry {
        user: actor,
        action: HistoryAction::Commented,
        field: Some("comments".to_string()),
        old_value: JsonValue::Null,
        new_value: JsonValue::String(text.to_string()),
        timestamp,
    }
}
