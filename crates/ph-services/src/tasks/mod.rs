//! Task services
//!
//! - [`TaskQueryService`]: listing and lookup
//! - [`CreateTaskService`]: new tasks with assignment notifications
//! - [`UpdateTaskService`]: the workflow guarded update with history
//! - [`AddCommentService`]: threaded comments with mentions
//! - [`DeleteTaskService`]: removal without cascade

mod comments;
mod create;
mod delete;
mod update;

pub use comments::AddCommentService;
pub use create::CreateTaskService;
pub use delete::DeleteTaskService;
pub use update::UpdateTaskService;

use ph_core::{traits::Id, PhError, PhResult};
use ph_models::Task;
use ph_queries::{Filter, Query};
use serde::Deserialize;

use crate::context::ServiceContext;

/// Optional narrowing of a task listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(default, alias = "projectId")]
    pub project: Option<Id>,
    #[serde(default)]
    pub parent_task: Option<Id>,
}

impl TaskFilter {
    pub fn for_project(project: Id) -> Self {
        Self {
            project: Some(project),
            ..Default::default()
        }
    }

    fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(project) = self.project {
            query = query.filter(Filter::equals("project", project));
        }
        if let Some(parent) = self.parent_task {
            query = query.filter(Filter::equals("parentTask", parent));
        }
        query.sort_asc("order")
    }
}

pub struct TaskQueryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TaskQueryService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Tasks matching the filter; every task when the filter is empty
    pub async fn list(&self, filter: &TaskFilter) -> PhResult<Vec<Task>> {
        Ok(self.ctx.db.tasks().find(&filter.to_query()).await?)
    }

    pub async fn get(&self, id: Id) -> PhResult<Task> {
        load_task(self.ctx, id).await
    }
}

pub(crate) async fn load_task(ctx: &ServiceContext, id: Id) -> PhResult<Task> {
    ctx.db
        .tasks()
        .find_by_id(id)
        .await?
        .ok_or_else(|| PhError::not_found_with("Task", id, "Task not found"))
}
