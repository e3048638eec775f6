//! Project files
//!
//! A file is a metadata document pointing at a URL. The URL either comes
//! from the client or from an upload stored through the [`Uploader`].

use chrono::{DateTime, Utc};
use ph_attachments::{Upload, Uploader};
use ph_auth::CurrentUser;
use ph_contracts::validate_input;
use ph_core::{traits::Id, PhError, PhResult};
use ph_models::{CreateFileRecord, FileRecord, Role};
use serde::Serialize;
use tracing::{info, instrument};

use crate::context::ServiceContext;
use crate::views::{user_refs, UserRef};

/// A file with its uploader embedded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileView {
    pub id: Id,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<Id>,
    pub uploaded_by: Option<UserRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct FileService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
    uploader: &'a Uploader,
}

impl<'a> FileService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a CurrentUser, uploader: &'a Uploader) -> Self {
        Self {
            ctx,
            user,
            uploader,
        }
    }

    /// Files of a project; the project is mandatory
    pub async fn list(&self, project: Option<Id>) -> PhResult<Vec<FileView>> {
        let project = project.ok_or_else(|| PhError::bad_request("Please provide a projectId"))?;
        let files = self.ctx.db.files().for_project(project).await?;
        let uploaders = user_refs(&self.ctx.db, files.iter().map(|f| f.uploaded_by)).await?;

        Ok(files
            .into_iter()
            .map(|f| FileView {
                uploaded_by: uploaders.get(&f.uploaded_by).cloned(),
                id: f.id,
                name: f.name,
                url: f.url,
                project: f.project,
                size: f.size,
                file_type: f.file_type,
                created_at: f.created_at,
            })
            .collect())
    }

    /// Record a file that is already hosted somewhere
    #[instrument(skip(self, input), fields(user = %self.user.id))]
    pub async fn create(&self, input: CreateFileRecord) -> PhResult<FileRecord> {
        validate_input(&input)?;
        self.require_project(input.project).await?;

        let file = FileRecord::new(self.user.id, input);
        self.ctx.db.files().insert(&file).await?;
        info!(file = %file.id, "file recorded");
        Ok(file)
    }

    /// Store an uploaded file and record it against a project
    #[instrument(skip(self, upload), fields(user = %self.user.id, name = %upload.original_name))]
    pub async fn upload(&self, project: Option<Id>, upload: Upload) -> PhResult<FileRecord> {
        self.require_project(project).await?;
        if upload.original_name.trim().is_empty() {
            return Err(PhError::bad_request("Please add a file name"));
        }

        let stored = self.uploader.store(upload).await?;
        let file = FileRecord::new(
            self.user.id,
            CreateFileRecord {
                name: stored.original_name,
                url: stored.url,
                project,
                size: Some(stored.size),
                file_type: Some(stored.content_type),
            },
        );
        self.ctx.db.files().insert(&file).await?;
        info!(file = %file.id, disk_name = %stored.disk_name, "file uploaded");
        Ok(file)
    }

    /// Delete a file record; the uploader, admins and project managers may
    /// do so. Stored content is not removed.
    #[instrument(skip(self), fields(user = %self.user.id))]
    pub async fn delete(&self, id: Id) -> PhResult<()> {
        let file = self
            .ctx
            .db
            .files()
            .find_by_id(id)
            .await?
            .ok_or_else(|| PhError::not_found_with("File", id, "File not found"))?;

        let privileged = self.user.has_any_role(&[Role::Admin, Role::ProjectManager]);
        if file.uploaded_by != self.user.id && !privileged {
            return Err(PhError::forbidden("Not authorized to delete this file"));
        }

        self.ctx.db.files().delete(file.id).await?;
        info!(file = %file.id, "file deleted");
        Ok(())
    }

    async fn require_project(&self, project: Option<Id>) -> PhResult<()> {
        match project {
            Some(id) if self.ctx.db.projects().exists(id).await? => Ok(()),
            Some(id) => Err(PhError::not_found_with("Project", id, "Project not found")),
            None => Err(PhError::not_found_with("Project", "none", "Project not found")),
        }
    }
}
