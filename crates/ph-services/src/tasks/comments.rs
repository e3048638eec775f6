//! Task comments

use chrono::Utc;
use ph_auth::CurrentUser;
use ph_contracts::validate_input;
use ph_core::{
    traits::{new_id, Id},
    PhError, PhResult,
};
use ph_journals::comment_entry;
use ph_models::{Comment, CreateComment, Task};
use ph_notifications::{extract_mentions, NotificationEvent};
use tracing::{info, instrument};

use super::load_task;
use crate::context::ServiceContext;

/// Appends a comment authored by the caller.
///
/// `@Full Name` mentions are resolved against the manager and members of the
/// task's project. Mentioned users and, for replies, the author of the parent
/// comment are notified.
pub struct AddCommentService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
}

impl<'a> AddCommentService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a CurrentUser) -> Self {
        Self { ctx, user }
    }

    #[instrument(skip(self, input), fields(user = %self.user.id))]
    pub async fn call(self, task_id: Id, input: CreateComment) -> PhResult<Task> {
        validate_input(&input)?;
        let text = input.text.trim().to_string();
        if text.is_empty() {
            return Err(PhError::bad_request("Please add comment text"));
        }

        let mut task = load_task(self.ctx, task_id).await?;

        let parent_author = match input.parent_comment {
            Some(parent) => Some(
                task.find_comment(parent)
                    .map(|c| c.user)
                    .ok_or_else(|| PhError::bad_request("Parent comment not found"))?,
            ),
            None => None,
        };

        let mentions = self.mentioned_users(&task, &text).await?;
        let now = Utc::now();
        task.comments.push(Comment {
            id: new_id(),
            user: self.user.id,
            text: text.clone(),
            parent_comment: input.parent_comment,
            mentions: mentions.clone(),
            created_at: now,
        });
        task.history.push(comment_entry(self.user.id, &text, now));

        self.ctx.db.tasks().save(&task).await?;
        info!(task = %task.id, mentions = mentions.len(), "comment added");

        if !mentions.is_empty() {
            self.ctx
                .notifier
                .dispatch(NotificationEvent::Mentioned {
                    task: task.id,
                    title: task.title.clone(),
                    actor_name: self.user.name.clone(),
                    mentioned: mentions,
                    actor: self.user.id,
                })
                .await;
        }
        if let Some(parent_author) = parent_author {
            self.ctx
                .notifier
                .dispatch(NotificationEvent::CommentReply {
                    task: task.id,
                    title: task.title.clone(),
                    actor_name: self.user.name.clone(),
                    parent_author,
                    actor: self.user.id,
                })
                .await;
        }

        Ok(task)
    }

    async fn mentioned_users(&self, task: &Task, text: &str) -> PhResult<Vec<Id>> {
        if !text.contains('@') {
            return Ok(vec![]);
        }
        let Some(project) = self.ctx.db.projects().find_by_id(task.project).await? else {
            return Ok(vec![]);
        };
        let people = self
            .ctx
            .db
            .users()
            .find_by_ids(&project.participants())
            .await?;
        Ok(extract_mentions(
            text,
            people.iter().map(|u| (u.id, u.name.as_str())),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures;
    use ph_models::{HistoryAction, NotificationType, Role};
    use serde_json::json;

    fn comment(text: &str, parent: Option<Id>) -> CreateComment {
        CreateComment {
            text: text.into(),
            parent_comment: parent,
        }
    }

    #[tokio::test]
    async fn test_comment_with_mention_and_reply() {
        let ctx = ServiceContext::in_memory();
        let org = new_id();
        let pm = fixtures::user(&ctx, "Pat Manager", Role::ProjectManager, org).await;
        let dev = fixtures::user(&ctx, "Dev Ops", Role::Member, org).await;
        let outsider = fixtures::user(&ctx, "Olga", Role::Member, org).await;
        let project = fixtures::project(&ctx, &pm, vec![dev.id]).await;
        let task = fixtures::task(&ctx, project.id, pm.id, json!({"title": "Docs"})).await;

        let task = AddCommentService::new(&ctx, &pm)
            .call(task.id, comment("@dev ops and @Olga please look", None))
            .await
            .unwrap();
        assert_eq!(task.comments.len(), 1);
        assert_eq!(task.comments[0].mentions, vec![dev.id]);
        assert_eq!(task.history.last().unwrap().action, HistoryAction::Commented);

        let inbox = ctx.db.notifications().latest_for(dev.id, 10).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::Mention);
        assert_eq!(inbox[0].message, "Pat Manager mentioned you in: Docs");
        assert!(ctx.db.notifications().latest_for(outsider.id, 10).await.unwrap().is_empty());

        let parent = task.comments[0].id;
        let task = AddCommentService::new(&ctx, &dev)
            .call(task.id, comment("On it", Some(parent)))
            .await
            .unwrap();
        assert_eq!(task.comments[1].parent_comment, Some(parent));

        let inbox = ctx.db.notifications().latest_for(pm.id, 10).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::CommentReply);
        assert_eq!(inbox[0].message, "Dev Ops replied to your comment on: Docs");
    }

    #[tokio::test]
    async fn test_unknown_parent_comment() {
        let ctx = ServiceContext::in_memory();
        let pm = fixtures::user(&ctx, "Pat", Role::ProjectManager, new_id()).await;
        let project = fixtures::project(&ctx, &pm, vec![]).await;
        let task = fixtures::task(&ctx, project.id, pm.id, json!({})).await;

        let err = AddCommentService::new(&ctx, &pm)
            .call(task.id, comment("hi", Some(new_id())))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);

        let err = AddCommentService::new(&ctx, &pm)
            .call(task.id, comment("   ", None))
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), "Please add comment text");
    }
}
