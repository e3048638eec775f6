//! Milestone lookups

use ph_core::traits::Id;
use ph_models::Milestone;
use ph_queries::{Filter, Query};

use crate::error::StoreResult;
use crate::repository::Repository;

impl Repository<Milestone> {
    /// Milestones of a project by due date; undated ones last
    pub async fn for_project(&self, project: Id) -> StoreResult<Vec<Milestone>> {
        let query = Query::new()
            .filter(Filter::equals("project", project))
            .sort_asc("dueDate");
        self.find(&query).await
    }

    pub async fn in_projects(&self, projects: &[Id]) -> StoreResult<Vec<Milestone>> {
        if projects.is_empty() {
            return Ok(vec![]);
        }
        self.find(&Query::new().filter(Filter::in_ids("project", projects.to_vec())))
            .await
    }
}
