//! # ph-contracts
//!
//! Contract validation for ProjectHub.
//!
//! Contracts validate entities before they are persisted and enforce the
//! task workflow rules. They never touch storage: callers load whatever
//! related documents a contract needs and pass them in.

pub mod base;
pub mod milestones;
pub mod projects;
pub mod tasks;
pub mod timesheets;

pub use base::*;
pub use milestones::MilestoneContract;
pub use projects::ProjectContract;
pub use tasks::{TaskContract, TaskTransitionContract};
pub use timesheets::TimesheetContract;
