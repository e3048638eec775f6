//! # ph-models
//!
//! Domain models for ProjectHub.
//!
//! Every entity is stored as a JSON document in its own collection. Field
//! names are camelCase both in storage and on the wire, and references to
//! other documents are plain ids.

pub use ph_core::traits::{Document, Id, Identifiable, Timestamped};

/// Implements the document traits for a model with `id` and `created_at` fields.
macro_rules! document {
    ($ty:ty, $collection:expr, $type_name:expr) => {
        impl ph_core::traits::Identifiable for $ty {
            fn id(&self) -> ph_core::traits::Id {
                self.id
            }
        }

        impl ph_core::traits::Timestamped for $ty {
            fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.created_at
            }
        }

        impl ph_core::traits::Document for $ty {
            const COLLECTION: &'static str = $collection;
            const TYPE_NAME: &'static str = $type_name;
        }
    };
}

pub mod dates;
pub mod discussion;
pub mod file;
pub mod milestone;
pub mod notification;
pub mod organization;
pub mod project;
pub mod task;
pub mod timesheet;
pub mod user;

pub use discussion::{CreateDiscussion, Discussion};
pub use file::{CreateFileRecord, FileRecord};
pub use milestone::{CreateMilestone, Milestone, MilestoneStatus, UpdateMilestone};
pub use notification::{Notification, NotificationType};
pub use organization::{Organization, OrganizationSettings, Subscription, SubscriptionPlan, SubscriptionStatus};
pub use project::{CreateProject, Project, ProjectPriority, ProjectStatus, UpdateProject};
pub use task::{
    Comment, CreateComment, CreateTask, HistoryAction, HistoryEntry, Task, TaskAttachment,
    TaskPriority, TaskStatus, TaskType, UpdateTask,
};
pub use timesheet::{CreateTimesheet, Timesheet, TimesheetStatus};
pub use user::{LoginUser, RegisterUser, Role, User};
