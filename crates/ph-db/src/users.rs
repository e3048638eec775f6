//! User and organization lookups

use ph_core::traits::Id;
use ph_models::user::normalize_email;
use ph_models::{Organization, User};
use ph_queries::{Filter, Query};

use crate::error::StoreResult;
use crate::repository::Repository;

impl Repository<User> {
    /// Find a user by e-mail, case-insensitively
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.find_one(Query::new().filter(Filter::equals("email", normalize_email(email))))
            .await
    }

    /// Users of an organization; every user when `organization` is `None`
    pub async fn in_organization(&self, organization: Option<Id>) -> StoreResult<Vec<User>> {
        match organization {
            Some(org) => {
                self.find(&Query::new().filter(Filter::equals("organization", org)))
                    .await
            }
            None => self.all().await,
        }
    }
}

impl Repository<Organization> {
    pub async fn find_by_name(&self, name: &str) -> StoreResult<Option<Organization>> {
        self.find_one(Query::new().filter(Filter::equals("name", name.trim())))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use ph_models::Role;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_find_by_email_ignores_case() {
        let repo: Repository<User> = Repository::new(Arc::new(MemoryStore::new()));
        let user = User::new("Ada", "ada@example.com", "hash", Role::Member);
        repo.insert(&user).await.unwrap();

        let found = repo.find_by_email(" ADA@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(repo.find_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_organization() {
        let repo: Repository<User> = Repository::new(Arc::new(MemoryStore::new()));
        let org = ph_core::traits::new_id();
        let inside = User::new("A", "a@example.com", "h", Role::Admin).with_organization(org);
        let outside = User::new("B", "b@example.com", "h", Role::Member);
        repo.insert(&inside).await.unwrap();
        repo.insert(&outside).await.unwrap();

        assert_eq!(repo.in_organization(Some(org)).await.unwrap().len(), 1);
        assert_eq!(repo.in_organization(None).await.unwrap().len(), 2);
    }
}
