//! Timesheet lookups

use ph_core::traits::Id;
use ph_models::{Timesheet, TimesheetStatus};
use ph_queries::{Filter, Query};

use crate::error::StoreResult;
use crate::repository::Repository;

impl Repository<Timesheet> {
    /// A user's entries, most recent date first
    pub async fn for_user(&self, user: Id) -> StoreResult<Vec<Timesheet>> {
        let query = Query::new()
            .filter(Filter::equals("user", user))
            .sort_desc("date");
        self.find(&query).await
    }

    pub async fn in_projects(&self, projects: &[Id]) -> StoreResult<Vec<Timesheet>> {
        if projects.is_empty() {
            return Ok(vec![]);
        }
        self.find(&Query::new().filter(Filter::in_ids("project", projects.to_vec())))
            .await
    }

    /// Number of entries in the given projects awaiting approval
    pub async fn count_submitted(&self, projects: &[Id]) -> StoreResult<u64> {
        if projects.is_empty() {
            return Ok(0);
        }
        let query = Query::new()
            .filter(Filter::in_ids("project", projects.to_vec()))
            .filter(Filter::equals("status", TimesheetStatus::Submitted.as_str()));
        self.count(&query).await
    }
}
