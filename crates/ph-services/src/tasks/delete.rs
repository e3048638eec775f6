//! Delete service for tasks

use ph_auth::CurrentUser;
use ph_core::{traits::Id, PhResult};
use tracing::{info, instrument};

use super::load_task;
use crate::context::ServiceContext;

/// Removes a single task. Subtasks, time entries and notifications that
/// reference it are kept.
pub struct DeleteTaskService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
}

impl<'a> DeleteTaskService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a CurrentUser) -> Self {
        Self { ctx, user }
    }

    #[instrument(skip(self), fields(user = %self.user.id))]
    pub async fn call(self, id: Id) -> PhResult<()> {
        let task = load_task(self.ctx, id).await?;
        self.ctx.db.tasks().delete(task.id).await?;
        info!(task = %task.id, "task deleted");
        Ok(())
    }
}
