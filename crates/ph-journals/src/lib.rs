//! # ph-journals
//!
//! Task history for ProjectHub.
//!
//! Every accepted task update is diffed against a fixed watch list of
//! fields and each changed field becomes one immutable [`HistoryEntry`]
//! appended to the task.
//!
//! [`HistoryEntry`]: ph_models::HistoryEntry

pub mod diff;
pub mod fields;

pub use diff::{comment_entry, FieldChange, TaskDiff};
pub use fields::TrackedField;
