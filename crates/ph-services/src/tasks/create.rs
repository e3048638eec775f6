//! Create service for tasks

use ph_auth::CurrentUser;
use ph_contracts::{validate_input, Contract, TaskContract};
use ph_core::{PhError, PhResult};
use ph_models::{CreateTask, Task};
use ph_notifications::NotificationEvent;
use tracing::{info, instrument};

use crate::context::ServiceContext;

/// Creates a task reported by the caller.
///
/// Every assignee receives a `task_assignment` notification and the project
/// manager hears about the new task unless they created it.
pub struct CreateTaskService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
    send_notifications: bool,
}

impl<'a> CreateTaskService<'a> {
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

    #[instrument(skip(self, input), fields(user = %self.user.id, project = %input.project))]
    pub async fn call(self, input: CreateTask) -> PhResult<Task> {
        validate_input(&input)?;

        let project = self
            .ctx
            .db
            .projects()
            .find_by_id(input.project)
            .await?
            .ok_or_else(|| PhError::not_found_with("Project", input.project, "Project not found"))?;

        let task = Task::from_input(input, self.user.id);
        TaskContract.validate(&task)?;
        self.ctx.db.tasks().insert(&task).await?;
        info!(task = %task.id, "task created");

        if self.send_notifications {
            self.ctx
                .notifier
                .dispatch(NotificationEvent::TaskCreated {
                    task: task.id,
                    title: task.title.clone(),
                    project_title: project.title.clone(),
                    project_manager: project.manager,
                    assignees: task.assignees.clone(),
                    actor: self.user.id,
                })
                .await;
        }

        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures;
    use ph_core::traits::new_id;
    use ph_models::{NotificationType, Role, TaskStatus};
    use serde_json::json;

    fn input(value: serde_json::Value) -> CreateTask {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_notifies_assignees_and_manager() {
        let ctx = ServiceContext::in_memory();
        let org = new_id();
        let pm = fixtures::user(&ctx, "Pat", Role::ProjectManager, org).await;
        let lead = fixtures::user(&ctx, "Lee", Role::TeamLead, org).await;
        let dev = fixtures::user(&ctx, "Dev", Role::Member, org).await;
        let project = fixtures::project(&ctx, &pm, vec![lead.id, dev.id]).await;

        let task = CreateTaskService::new(&ctx, &lead)
            .call(input(json!({
                "title": "Write docs",
                "project": project.id,
                "assignees": [dev.id]
            })))
            .await
            .unwrap();

        assert_eq!(task.reporter, lead.id);
        assert_eq!(task.status, TaskStatus::Todo);

        let dev_inbox = ctx.db.notifications().latest_for(dev.id, 10).await.unwrap();
        assert_eq!(dev_inbox.len(), 1);
        assert_eq!(dev_inbox[0].notification_type, NotificationType::TaskAssignment);
        assert_eq!(dev_inbox[0].title, "New Task Assigned");

        let pm_inbox = ctx.db.notifications().latest_for(pm.id, 10).await.unwrap();
        assert_eq!(pm_inbox.len(), 1);
        assert_eq!(pm_inbox[0].title, "New Task Created");
        assert_eq!(pm_inbox[0].link, Some(format!("/tasks/{}", task.id)));
    }

    #[tokio::test]
    async fn test_manager_creating_is_not_notified() {
        let ctx = ServiceContext::in_memory();
        let pm = fixtures::user(&ctx, "Pat", Role::ProjectManager, new_id()).await;
        let project = fixtures::project(&ctx, &pm, vec![]).await;

        CreateTaskService::new(&ctx, &pm)
            .call(input(json!({"title": "Plan", "project": project.id})))
            .await
            .unwrap();
        assert!(ctx.db.notifications().latest_for(pm.id, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_project() {
        let ctx = ServiceContext::in_memory();
        let user = fixtures::user(&ctx, "Ada", Role::Member, new_id()).await;
        let err = CreateTaskService::new(&ctx, &user)
            .call(input(json!({"title": "Plan", "project": new_id()})))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.client_message(), "Project not found");
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let ctx = ServiceContext::in_memory();
        let pm = fixtures::user(&ctx, "Pat", Role::ProjectManager, new_id()).await;
        let project = fixtures::project(&ctx, &pm, vec![]).await;
        let err = CreateTaskService::without_notifications(&ctx, &pm)
            .call(input(json!({"title": "   ", "project": project.id})))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.client_message(), "Please add a task title");
    }
}
