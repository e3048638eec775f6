//! File metadata lookups

use ph_core::traits::Id;
use ph_models::FileRecord;
use ph_queries::{Filter, Query};

use crate::error::StoreResult;
use crate::repository::Repository;

impl Repository<FileRecord> {
    pub async fn for_project(&self, project: Id) -> StoreResult<Vec<FileRecord>> {
        self.find(&Query::new().filter(Filter::equals("project", project)))
            .await
    }
}
