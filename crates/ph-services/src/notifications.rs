//! The caller's notification inbox

use ph_auth::CurrentUser;
use ph_core::{traits::Id, PhError, PhResult};
use ph_models::Notification;
use tracing::{debug, instrument};

use crate::context::ServiceContext;

/// How many notifications an inbox listing returns
pub const INBOX_LIMIT: usize = 20;

pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
}

impl<'a> NotificationService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a CurrentUser) -> Self {
        Self { ctx, user }
    }

    /// Newest notifications first
    pub async fn list(&self) -> PhResult<Vec<Notification>> {
        Ok(self
            .ctx
            .db
            .notifications()
            .latest_for(self.user.id, INBOX_LIMIT)
            .await?)
    }

    pub async fn unread_count(&self) -> PhResult<u64> {
        Ok(self.ctx.db.notifications().count_unread(self.user.id).await?)
    }

    /// Mark one notification read; only its recipient may do so
    #[instrument(skip(self), fields(user = %self.user.id))]
    pub async fn mark_read(&self, id: Id) -> PhResult<Notification> {
        let repo = self.ctx.db.notifications();
        let mut notification = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| PhError::not_found_with("Notification", id, "Notification not found"))?;

        if notification.recipient != self.user.id {
            return Err(PhError::forbidden("Not authorized"));
        }

        if !notification.is_read {
            notification.mark_read();
            repo.save(&notification).await?;
        }
        Ok(notification)
    }

    /// Mark every unread notification of the caller read; returns how many
    /// changed
    #[instrument(skip(self), fields(user = %self.user.id))]
    pub async fn mark_all_read(&self) -> PhResult<usize> {
        let repo = self.ctx.db.notifications();
        let unread = repo.unread_for(self.user.id).await?;
        let count = unread.len();
        for mut notification in unread {
            notification.mark_read();
            repo.save(&notification).await?;
        }
        debug!(count, "notifications marked read");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures;
    use chrono::{Duration, Utc};
    use ph_core::traits::new_id;
    use ph_models::{NotificationType, Role};

    async fn seed(ctx: &ServiceContext, recipient: Id, count: usize) -> Vec<Notification> {
        let start = Utc::now() - Duration::minutes(count as i64);
        let mut out = vec![];
        for i in 0..count {
            let mut n = Notification::new(
                recipient,
                NotificationType::ProjectUpdate,
                format!("n{}", i),
                "message",
            );
            n.created_at = start + Duration::seconds(i as i64);
            ctx.db.notifications().insert(&n).await.unwrap();
            out.push(n);
        }
        out
    }

    #[tokio::test]
    async fn test_list_newest_first_limited() {
        let ctx = ServiceContext::in_memory();
        let user = fixtures::user(&ctx, "Ada", Role::Member, new_id()).await;
        seed(&ctx, user.id, 25).await;

        let service = NotificationService::new(&ctx, &user);
        let inbox = service.list().await.unwrap();
        assert_eq!(inbox.len(), INBOX_LIMIT);
        assert_eq!(inbox[0].title, "n24");
        assert_eq!(service.unread_count().await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_mark_read() {
        let ctx = ServiceContext::in_memory();
        let org = new_id();
        let user = fixtures::user(&ctx, "Ada", Role::Member, org).await;
        let other = fixtures::user(&ctx, "Bob", Role::Member, org).await;
        let seeded = seed(&ctx, user.id, 3).await;

        let err = NotificationService::new(&ctx, &other)
            .mark_read(seeded[0].id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        let err = NotificationService::new(&ctx, &user)
            .mark_read(new_id())
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), "Notification not found");

        let service = NotificationService::new(&ctx, &user);
        assert!(service.mark_read(seeded[0].id).await.unwrap().is_read);
        assert_eq!(service.unread_count().await.unwrap(), 2);

        assert_eq!(service.mark_all_read().await.unwrap(), 2);
        assert_eq!(service.unread_count().await.unwrap(), 0);
        assert_eq!(service.mark_all_read().await.unwrap(), 0);
    }
}
