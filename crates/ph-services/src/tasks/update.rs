//! Update service for tasks
//!
//! The update runs in three steps:
//!
//! 1. A submitted `done` or `in_progress` status is checked against the
//!    task's dependencies (and, for `done`, its subtasks). A violation
//!    rejects the whole update before any field is applied.
//! 2. The submitted fields are applied and every changed field of the watch
//!    list is appended to the task history.
//! 3. The reporter hears about a status change and new assignees hear about
//!    their assignment. Notification failures never fail the update.

use chrono::Utc;
use ph_auth::CurrentUser;
use ph_contracts::{validate_input, Contract, TaskContract, TaskTransitionContract};
use ph_core::{traits::Id, PhError, PhResult};
use ph_journals::{TaskDiff, TrackedField};
use ph_models::{Task, TaskStatus, UpdateTask};
use ph_notifications::NotificationEvent;
use tracing::{debug, info, instrument};

use super::load_task;
use crate::context::ServiceContext;

/// Service for updating tasks
///
/// # Example
/// ```ignore
/// let task = UpdateTaskService::new(&ctx, &user)
///     .call(task_id, UpdateTask { status: Some(TaskStatus::Done), ..Default::default() })
///     .await?;
/// ```
pub struct UpdateTaskService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
    send_notifications: bool,
}

impl<'a> UpdateTaskService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a CurrentUser) -> Self {
        Self {
            ctx,
            user,
            send_notifications: true,
        }
    }

    pub fn without_notifications(ctx: &'a ServiceContext, user: &'a CurrentUser) -> Self {
        Self {
            ctx,
            user,
            send_notifications: false,
        }
    }

    #[instrument(skip(self, input), fields(user = %self.user.id))]
    pub async fn call(self, id: Id, input: UpdateTask) -> PhResult<Task> {
        validate_input(&input)?;
        let original = load_task(self.ctx, id).await?;

        if let Some(status) = input.status {
            self.check_transition(&original, status).await?;
        }

        let mut task = original.clone();
        input.apply_to(&mut task);
        TaskContract.validate(&task)?;

        let diff = TaskDiff::compute(&original, &task)
            .map_err(|e| PhError::Internal(format!("task diff: {}", e)))?;
        let status_changed = diff.changed(TrackedField::Status);
        let assignees_changed = diff.changed(TrackedField::Assignees);
        debug!(changes = diff.len(), "task diff computed");

        task.history.extend(diff.into_history(self.user.id, Utc::now()));
        self.ctx.db.tasks().save(&task).await?;
        info!(task = %task.id, status = %task.status, "task updated");

        if self.send_notifications {
            self.notify(&task, status_changed, assignees_changed).await;
        }

        Ok(task)
    }

    /// Enforce the dependency and subtask guards for a submitted status.
    /// Dependencies that no longer exist are not considered.
    async fn check_transition(&self, task: &Task, target: TaskStatus) -> PhResult<()> {
        if !TaskTransitionContract::is_guarded(target) {
            return Ok(());
        }

        let tasks = self.ctx.db.tasks();
        let dependencies = tasks.find_by_ids(&task.dependencies).await?;
        let subtasks = if target == TaskStatus::Done {
            tasks.children_of(task.id).await?
        } else {
            vec![]
        };

        TaskTransitionContract::new(&dependencies, &subtasks).check(target)?;
        Ok(())
    }

    async fn notify(&self, task: &Task, status_changed: bool, assignees_changed: bool) {
        if status_changed {
            self.ctx
                .notifier
                .dispatch(NotificationEvent::TaskStatusChanged {
                    task: task.id,
                    title: task.title.clone(),
                    status: task.status,
                    reporter: task.reporter,
                    actor: self.user.id,
                })
                .await;
        }

        if assignees_changed {
            self.ctx
                .notifier
                .dispatch(NotificationEvent::TaskAssigned {
                    task: task.id,
                    title: task.title.clone(),
                    assignees: task.assignees.clone(),
                    actor: self.user.id,
                })
                .await;
        }
    }
}
