//! Task lookups

use ph_core::traits::Id;
use ph_models::Task;
use ph_queries::{Filter, Query};

use crate::error::StoreResult;
use crate::repository::Repository;

impl Repository<Task> {
    /// Tasks whose `parentTask` is the given task
    pub async fn children_of(&self, parent: Id) -> StoreResult<Vec<Task>> {
        self.find(&Query::new().filter(Filter::equals("parentTask", parent)))
            .await
    }

    pub async fn for_project(&self, project: Id) -> StoreResult<Vec<Task>> {
        self.find(&Query::new().filter(Filter::equals("project", project)))
            .await
    }

    pub async fn in_projects(&self, projects: &[Id]) -> StoreResult<Vec<Task>> {
        if projects.is_empty() {
            return Ok(vec![]);
        }
        self.find(&Query::new().filter(Filter::in_ids("project", projects.to_vec())))
            .await
    }

    /// Tasks assigned to the user, earliest due date first
    pub async fn assigned_to(&self, user: Id) -> StoreResult<Vec<Task>> {
        let query = Query::new()
            .filter(Filter::contains("assignees", user))
            .sort_asc("dueDate");
        self.find(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use ph_core::traits::new_id;
    use ph_models::CreateTask;
    use std::sync::Arc;

    fn task(project: Id, extra: serde_json::Value) -> Task {
        let mut payload = serde_json::json!({"title": "T", "project": project});
        if let (Some(base), Some(extra)) = (payload.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        let input: CreateTask = serde_json::from_value(payload).unwrap();
        Task::from_input(input, new_id())
    }

    #[tokio::test]
    async fn test_children_and_assigned() {
        let repo: Repository<Task> = Repository::new(Arc::new(MemoryStore::new()));
        let project = new_id();
        let me = new_id();

        let parent = task(project, serde_json::json!({}));
        let late = task(project, serde_json::json!({"parentTask": parent.id, "assignees": [me], "dueDate": "2024-02-01"}));
        let early = task(new_id(), serde_json::json!({"assignees": [me], "dueDate": "2024-01-01"}));
        let undated = task(project, serde_json::json!({"assignees": [me]}));
        for t in [&parent, &late, &early, &undated] {
            repo.insert(t).await.unwrap();
        }

        let children = repo.children_of(parent.id).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, late.id);

        let assigned: Vec<Id> = repo.assigned_to(me).await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(assigned, vec![early.id, late.id, undated.id]);

        assert_eq!(repo.for_project(project).await.unwrap().len(), 3);
        assert_eq!(repo.in_projects(&[project]).await.unwrap().len(), 3);
        assert!(repo.in_projects(&[]).await.unwrap().is_empty());
    }
}
