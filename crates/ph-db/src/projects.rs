//! Project lookups

use ph_core::traits::Id;
use ph_models::Project;
use ph_queries::{Filter, Query};

use crate::error::StoreResult;
use crate::repository::Repository;

impl Repository<Project> {
    /// Projects of an organization; every project when `organization` is `None`
    pub async fn in_organization(&self, organization: Option<Id>) -> StoreResult<Vec<Project>> {
        match organization {
            Some(org) => {
                self.find(&Query::new().filter(Filter::equals("organization", org)))
                    .await
            }
            None => self.all().await,
        }
    }

    /// Projects the user manages or is a member of
    pub async fn involving(&self, user: Id) -> StoreResult<Vec<Project>> {
        let query = Query::new().any_of(vec![
            Filter::equals("manager", user),
            Filter::contains("members", user),
        ]);
        self.find(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use chrono::Utc;
    use ph_core::traits::new_id;
    use ph_models::{ProjectPriority, ProjectStatus};
    use std::sync::Arc;

    fn project(manager: Id, members: Vec<Id>, organization: Id) -> Project {
        Project {
            id: new_id(),
            title: "P".into(),
            description: "D".into(),
            key: None,
            status: ProjectStatus::Active,
            priority: ProjectPriority::Medium,
            start_date: Utc::now().date_naive(),
            end_date: None,
            budget: None,
            manager,
            members,
            organization,
            category: None,
            tags: vec![],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_involving_matches_manager_or_member() {
        let repo: Repository<Project> = Repository::new(Arc::new(MemoryStore::new()));
        let me = new_id();
        let org = new_id();
        repo.insert(&project(me, vec![], org)).await.unwrap();
        repo.insert(&project(new_id(), vec![me], org)).await.unwrap();
        repo.insert(&project(new_id(), vec![], new_id())).await.unwrap();

        assert_eq!(repo.involving(me).await.unwrap().len(), 2);
        assert_eq!(repo.in_organization(Some(org)).await.unwrap().len(), 2);
        assert_eq!(repo.in_organization(None).await.unwrap().len(), 3);
    }
}
