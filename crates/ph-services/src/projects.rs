//! Project services

use ph_auth::{allow, authorize, CurrentUser};
use ph_contracts::{validate_input, Contract, ProjectContract};
use ph_core::{traits::Id, PhError, PhResult};
use ph_models::{CreateProject, Project, UpdateProject};
use ph_notifications::NotificationEvent;
use tracing::{info, instrument};

use crate::context::ServiceContext;

pub struct ProjectService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
}

impl<'a> ProjectService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a CurrentUser) -> Self {
        Self { ctx, user }
    }

    /// Projects of the caller's organization, or every project for callers
    /// outside any organization
    pub async fn list(&self) -> PhResult<Vec<Project>> {
        Ok(self
            .ctx
            .db
            .projects()
            .in_organization(self.user.organization)
            .await?)
    }

    pub async fn get(&self, id: Id) -> PhResult<Project> {
        load(self.ctx, id).await
    }

    /// Create a project managed by the caller inside their organization
    #[instrument(skip(self, input), fields(user = %self.user.id))]
    pub async fn create(&self, input: CreateProject) -> PhResult<Project> {
        authorize(self.user, allow::PROJECT_WRITE)?;
        validate_input(&input)?;

        let organization = self.user.organization.ok_or_else(|| {
            PhError::bad_request("You must belong to an organization to create a project")
        })?;

        let project = Project::new(input, self.user.id, organization);
        ProjectContract.validate(&project)?;
        self.ctx.db.projects().insert(&project).await?;
        info!(project = %project.id, "project created");

        self.ctx
            .notifier
            .dispatch(NotificationEvent::ProjectCreated {
                project: project.id,
                title: project.title.clone(),
                actor: self.user.id,
                members: project.members.clone(),
            })
            .await;

        Ok(project)
    }

    /// Update a project; only its manager or an admin may do so
    #[instrument(skip(self, input), fields(user = %self.user.id))]
    pub async fn update(&self, id: Id, input: UpdateProject) -> PhResult<Project> {
        authorize(self.user, allow::PROJECT_WRITE)?;
        let mut project = load(self.ctx, id).await?;

        if !project.is_manager(self.user.id) && !self.user.is_admin() {
            return Err(PhError::forbidden(format!(
                "User {} is not authorized to update this project",
                self.user.id
            )));
        }

        validate_input(&input)?;
        input.apply_to(&mut project);
        ProjectContract.validate(&project)?;
        self.ctx.db.projects().save(&project).await?;
        info!(project = %project.id, "project updated");

        Ok(project)
    }

    /// Delete a project. Tasks, milestones and other documents that refer
    /// to it are left in place.
    #[instrument(skip(self), fields(user = %self.user.id))]
    pub async fn delete(&self, id: Id) -> PhResult<()> {
        authorize(self.user, allow::PROJECT_DELETE)?;
        let project = load(self.ctx, id).await?;

        if !self.user.is_admin() {
            return Err(PhError::forbidden(format!(
                "User {} is not authorized to delete this project. Only admins can delete projects.",
                self.user.id
            )));
        }

        self.ctx.db.projects().delete(project.id).await?;
        info!(project = %project.id, "project deleted");
        Ok(())
    }
}

async fn load(ctx: &ServiceContext, id: Id) -> PhResult<Project> {
    ctx.db
        .projects()
        .find_by_id(id)
        .await?
        .ok_or_else(|| PhError::not_found_with("Project", id, format!("Project not found with id of {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures;
    use ph_core::traits::new_id;
    use ph_models::{NotificationType, Role};

    fn create_input(members: Vec<Id>) -> CreateProject {
        CreateProject {
            title: "Apollo".into(),
            description: "Moon landing".into(),
            key: Some(" apl ".into()),
            members,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_sets_manager_and_notifies() {
        let ctx = ServiceContext::in_memory();
        let org = new_id();
        let pm = fixtures::user(&ctx, "Pat", Role::ProjectManager, org).await;
        let member = fixtures::user(&ctx, "Mia", Role::Member, org).await;

        let project = ProjectService::new(&ctx, &pm)
            .create(create_input(vec![member.id, pm.id]))
            .await
            .unwrap();

        assert_eq!(project.manager, pm.id);
        assert_eq!(project.organization, org);
        assert_eq!(project.key.as_deref(), Some("APL"));

        let own = ctx.db.notifications().latest_for(pm.id, 10).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].title, "Project Created");
        let added = ctx.db.notifications().latest_for(member.id, 10).await.unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].notification_type, NotificationType::ProjectUpdate);
        assert_eq!(added[0].message, "You have been added to the project: Apollo");
    }

    #[tokio::test]
    async fn test_member_cannot_create() {
        let ctx = ServiceContext::in_memory();
        let member = fixtures::user(&ctx, "Mia", Role::Member, new_id()).await;
        let err = ProjectService::new(&ctx, &member)
            .create(create_input(vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[tokio::test]
    async fn test_create_requires_organization() {
        let ctx = ServiceContext::in_memory();
        let mut lead = fixtures::user(&ctx, "Lee", Role::TeamLead, new_id()).await;
        lead.organization = None;
        let err = ProjectService::new(&ctx, &lead)
            .create(create_input(vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_only_manager_or_admin_updates() {
        let ctx = ServiceContext::in_memory();
        let org = new_id();
        let pm = fixtures::user(&ctx, "Pat", Role::ProjectManager, org).await;
        let other_pm = fixtures::user(&ctx, "Olga", Role::ProjectManager, org).await;
        let admin = fixtures::user(&ctx, "Ada", Role::Admin, org).await;
        let project = fixtures::project(&ctx, &pm, vec![]).await;

        let input = UpdateProject {
            title: Some("Artemis".into()),
            ..Default::default()
        };
        let err = ProjectService::new(&ctx, &other_pm)
            .update(project.id, input.clone())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(
            err.to_string(),
            format!("User {} is not authorized to update this project", other_pm.id)
        );

        let updated = ProjectService::new(&ctx, &admin)
            .update(project.id, input)
            .await
            .unwrap();
        assert_eq!(updated.title, "Artemis");
    }

    #[tokio::test]
    async fn test_delete_is_admin_only_and_does_not_cascade() {
        let ctx = ServiceContext::in_memory();
        let org = new_id();
        let pm = fixtures::user(&ctx, "Pat", Role::ProjectManager, org).await;
        let admin = fixtures::user(&ctx, "Ada", Role::Admin, org).await;
        let member = fixtures::user(&ctx, "Mia", Role::Member, org).await;
        let project = fixtures::project(&ctx, &pm, vec![]).await;
        let task = fixtures::task(&ctx, project.id, pm.id, serde_json::json!({})).await;

        let err = ProjectService::new(&ctx, &member).delete(project.id).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert!(err.to_string().starts_with("Access denied"));

        let err = ProjectService::new(&ctx, &pm).delete(project.id).await.unwrap_err();
        assert!(err.to_string().ends_with("Only admins can delete projects."));

        ProjectService::new(&ctx, &admin).delete(project.id).await.unwrap();
        assert!(!ctx.db.projects().exists(project.id).await.unwrap());
        assert!(ctx.db.tasks().exists(task.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_project() {
        let ctx = ServiceContext::in_memory();
        let user = fixtures::user(&ctx, "Ada", Role::Admin, new_id()).await;
        let id = new_id();
        let err = ProjectService::new(&ctx, &user).get(id).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.client_message(), format!("Project not found with id of {}", id));
    }
}
