//! # ph-services
//!
//! Business logic services for ProjectHub.
//!
//! Handlers never talk to storage directly: every operation goes through a
//! service that checks roles and ownership, runs the contracts, writes the
//! documents and fans out notifications.
//!
//! Services are cheap to build. They borrow a [`ServiceContext`] (storage
//! plus notifier) and, where the operation is on behalf of a user, the
//! [`CurrentUser`](ph_auth::CurrentUser).

pub mod analytics;
pub mod auth;
pub mod context;
pub mod dashboard;
pub mod discussions;
pub mod files;
pub mod milestones;
pub mod notifications;
pub mod projects;
pub mod seed;
pub mod tasks;
pub mod timesheets;
pub mod users;
pub mod views;

pub use analytics::AnalyticsService;
pub use auth::{AuthService, AuthSession, UserProfile};
pub use context::ServiceContext;
pub use dashboard::DashboardService;
pub use discussions::DiscussionService;
pub use files::FileService;
pub use milestones::MilestoneService;
pub use notifications::NotificationService;
pub use projects::ProjectService;
pub use tasks::{
    AddCommentService, CreateTaskService, DeleteTaskService, TaskFilter, TaskQueryService,
    UpdateTaskService,
};
pub use seed::{seed_demo_data, SeedSummary};
pub use timesheets::TimesheetService;
pub use users::UserService;
