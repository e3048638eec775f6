//! Discussion lookups

use ph_core::traits::Id;
use ph_models::Discussion;
use ph_queries::{Filter, Query};

use crate::error::StoreResult;
use crate::repository::Repository;

impl Repository<Discussion> {
    /// Messages of a project, oldest first
    pub async fn for_project(&self, project: Id) -> StoreResult<Vec<Discussion>> {
        let query = Query::new()
            .filter(Filter::equals("project", project))
            .sort_asc("createdAt");
        self.find(&query).await
    }
}
