//! Notification lookups

use ph_core::traits::Id;
use ph_models::Notification;
use ph_queries::{Filter, Query};

use crate::error::StoreResult;
use crate::repository::Repository;

impl Repository<Notification> {
    /// Newest notifications addressed to a user
    pub async fn latest_for(&self, recipient: Id, limit: usize) -> StoreResult<Vec<Notification>> {
        let query = Query::new()
            .filter(Filter::equals("recipient", recipient))
            .sort_desc("createdAt")
            .limit(limit);
        self.find(&query).await
    }

    pub async fn unread_for(&self, recipient: Id) -> StoreResult<Vec<Notification>> {
        self.find(&unread_query(recipient)).await
    }

    pub async fn count_unread(&self, recipient: Id) -> StoreResult<u64> {
        self.count(&unread_query(recipient)).await
    }
}

fn unread_query(recipient: Id) -> Query {
    Query::new()
        .filter(Filter::equals("recipient", recipient))
        .filter(Filter::equals("isRead", false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use ph_core::traits::new_id;
    use ph_models::NotificationType;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_latest_and_unread() {
        let repo: Repository<Notification> = Repository::new(Arc::new(MemoryStore::new()));
        let me = new_id();
        let start = chrono::Utc::now();
        for i in 0..25 {
            let mut n = Notification::new(me, NotificationType::Mention, "T", format!("m{}", i));
            n.created_at = start + chrono::Duration::seconds(i);
            if i < 5 {
                n.mark_read();
            }
            repo.insert(&n).await.unwrap();
        }
        repo.insert(&Notification::new(new_id(), NotificationType::Mention, "T", "other"))
            .await
            .unwrap();

        let latest = repo.latest_for(me, 20).await.unwrap();
        assert_eq!(latest.len(), 20);
        assert_eq!(latest[0].message, "m24");
        assert_eq!(repo.count_unread(me).await.unwrap(), 20);
        assert_eq!(repo.unread_for(me).await.unwrap().len(), 20);
    }
}
