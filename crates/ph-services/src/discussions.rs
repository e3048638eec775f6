//! Project discussion threads

use chrono::{DateTime, Utc};
use ph_auth::CurrentUser;
use ph_contracts::validate_input;
use ph_core::{traits::Id, PhError, PhResult};
use ph_models::{CreateDiscussion, Discussion};
use serde::Serialize;
use tracing::{info, instrument};

use crate::context::ServiceContext;
use crate::views::{user_refs, UserRef};

/// A message with its sender embedded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionView {
    pub id: Id,
    pub project: Id,
    pub sender: Option<UserRef>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

pub struct DiscussionService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
}

impl<'a> DiscussionService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a CurrentUser) -> Self {
        Self { ctx, user }
    }

    /// Messages of a project in the order they were sent
    pub async fn list(&self, project: Option<Id>) -> PhResult<Vec<DiscussionView>> {
        let project = project.ok_or_else(|| PhError::bad_request("Please provide a projectId"))?;
        let messages = self.ctx.db.discussions().for_project(project).await?;
        self.populate(messages).await
    }

    #[instrument(skip(self, input), fields(user = %self.user.id, project = %input.project))]
    pub async fn send(&self, input: CreateDiscussion) -> PhResult<DiscussionView> {
        validate_input(&input)?;
        let content = input.content.trim();
        if content.is_empty() {
            return Err(PhError::bad_request("Please add message content"));
        }
        if !self.ctx.db.projects().exists(input.project).await? {
            return Err(PhError::not_found_with("Project", input.project, "Project not found"));
        }

        let message = Discussion::new(input.project, self.user.id, content);
        self.ctx.db.discussions().insert(&message).await?;
        info!(discussion = %message.id, "message sent");

        let mut views = self.populate(vec![message]).await?;
        views
            .pop()
            .ok_or_else(|| PhError::Internal("sent message vanished".into()))
    }

    async fn populate(&self, messages: Vec<Discussion>) -> PhResult<Vec<DiscussionView>> {
        let senders = user_refs(&self.ctx.db, messages.iter().map(|m| m.sender)).await?;
        Ok(messages
            .into_iter()
            .map(|m| DiscussionView {
                sender: senders.get(&m.sender).cloned(),
                id: m.id,
                project: m.project,
                content: m.content,
                created_at: m.created_at,
            })
            .collect())
    }
}
