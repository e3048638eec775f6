//! Milestone services

use ph_auth::{allow, authorize, CurrentUser};
use ph_contracts::{validate_input, Contract, MilestoneContract};
use ph_core::{traits::Id, PhError, PhResult};
use ph_models::{CreateMilestone, Milestone, UpdateMilestone};
use tracing::{info, instrument};

use crate::context::ServiceContext;

pub struct MilestoneService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
}

impl<'a> MilestoneService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a CurrentUser) -> Self {
        Self { ctx, user }
    }

    /// Milestones of a project, earliest due date first
    pub async fn list(&self, project: Id) -> PhResult<Vec<Milestone>> {
        Ok(self.ctx.db.milestones().for_project(project).await?)
    }

    pub async fn get(&self, id: Id) -> PhResult<Milestone> {
        self.load(id).await
    }

    #[instrument(skip(self, input), fields(user = %self.user.id))]
    pub async fn create(&self, project: Id, input: CreateMilestone) -> PhResult<Milestone> {
        authorize(self.user, allow::MILESTONE_WRITE)?;
        if !self.ctx.db.projects().exists(project).await? {
            return Err(PhError::not_found_with("Project", project, "Project not found"));
        }
        validate_input(&input)?;

        let milestone = Milestone::new(project, input);
        MilestoneContract.validate(&milestone)?;
        self.ctx.db.milestones().insert(&milestone).await?;
        info!(milestone = %milestone.id, project = %project, "milestone created");
        Ok(milestone)
    }

    #[instrument(skip(self, input), fields(user = %self.user.id))]
    pub async fn update(&self, id: Id, input: UpdateMilestone) -> PhResult<Milestone> {
        authorize(self.user, allow::MILESTONE_WRITE)?;
        let mut milestone = self.load(id).await?;
        validate_input(&input)?;

        input.apply_to(&mut milestone);
        MilestoneContract.validate(&milestone)?;
        self.ctx.db.milestones().save(&milestone).await?;
        info!(milestone = %milestone.id, "milestone updated");
        Ok(milestone)
    }

    /// Admins may delete any milestone, project managers only those of the
    /// projects they manage
    #[instrument(skip(self), fields(user = %self.user.id))]
    pub async fn delete(&self, id: Id) -> PhResult<()> {
        authorize(self.user, allow::MILESTONE_DELETE)?;
        let milestone = self.load(id).await?;

        let manages_project = match self.ctx.db.projects().find_by_id(milestone.project).await? {
            Some(project) => project.is_manager(self.user.id),
            None => false,
        };
        if !self.user.is_admin() && !manages_project {
            return Err(PhError::forbidden("Not authorized to delete this milestone"));
        }

        self.ctx.db.milestones().delete(milestone.id).await?;
        info!(milestone = %milestone.id, "milestone deleted");
        Ok(())
    }

    async fn load(&self, id: Id) -> PhResult<Milestone> {
        self.ctx
            .db
            .milestones()
            .find_by_id(id)
            .await?
            .ok_or_else(|| PhError::not_found_with("Milestone", id, "Milestone not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures;
    use chrono::NaiveDate;
    use ph_core::traits::new_id;
    use ph_models::{MilestoneStatus, Role};

    fn input(title: &str, due: Option<NaiveDate>) -> CreateMilestone {
        CreateMilestone {
            title: title.into(),
            due_date: due,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_list_by_due_date() {
        let ctx = ServiceContext::in_memory();
        let lead = fixtures::user(&ctx, "Lee", Role::TeamLead, new_id()).await;
        let project = fixtures::project(&ctx, &lead, vec![]).await;
        let service = MilestoneService::new(&ctx, &lead);

        service.create(project.id, input("Undated", None)).await.unwrap();
        service
            .create(project.id, input("Beta", NaiveDate::from_ymd_opt(2024, 9, 1)))
            .await
            .unwrap();
        service
            .create(project.id, input("Alpha", NaiveDate::from_ymd_opt(2024, 6, 1)))
            .await
            .unwrap();

        let titles: Vec<String> = service
            .list(project.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.title)
            .collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "Undated"]);
    }

    #[tokio::test]
    async fn test_create_checks_role_and_project() {
        let ctx = ServiceContext::in_memory();
        let member = fixtures::user(&ctx, "Mia", Role::Member, new_id()).await;
        let admin = fixtures::user(&ctx, "Ada", Role::Admin, new_id()).await;

        let err = MilestoneService::new(&ctx, &member)
            .create(new_id(), input("M1", None))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        let err = MilestoneService::new(&ctx, &admin)
            .create(new_id(), input("M1", None))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.client_message(), "Project not found");
    }

    #[tokio::test]
    async fn test_update_status() {
        let ctx = ServiceContext::in_memory();
        let pm = fixtures::user(&ctx, "Pat", Role::ProjectManager, new_id()).await;
        let project = fixtures::project(&ctx, &pm, vec![]).await;
        let service = MilestoneService::new(&ctx, &pm);
        let milestone = service.create(project.id, input("M1", None)).await.unwrap();

        let updated = service
            .update(
                milestone.id,
                UpdateMilestone {
                    status: Some(MilestoneStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, MilestoneStatus::Completed);

        let err = service.get(new_id()).await.unwrap_err();
        assert_eq!(err.client_message(), "Milestone not found");
    }

    #[tokio::test]
    async fn test_delete_requires_admin_or_project_manager() {
        let ctx = ServiceContext::in_memory();
        let org = new_id();
        let pm = fixtures::user(&ctx, "Pat", Role::ProjectManager, org).await;
        let other_pm = fixtures::user(&ctx, "Olga", Role::ProjectManager, org).await;
        let project = fixtures::project(&ctx, &pm, vec![]).await;
        let milestone = MilestoneService::new(&ctx, &pm)
            .create(project.id, input("M1", None))
            .await
            .unwrap();

        let err = MilestoneService::new(&ctx, &other_pm)
            .delete(milestone.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.to_string(), "Not authorized to delete this milestone");

        MilestoneService::new(&ctx, &pm).delete(milestone.id).await.unwrap();
        assert!(!ctx.db.milestones().exists(milestone.id).await.unwrap());
    }
}
