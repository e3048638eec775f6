//! Time tracking
//!
//! Entries are always scoped to the caller: they list, log and export only
//! their own time.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use ph_auth::CurrentUser;
use ph_contracts::{validate_input, Contract, TimesheetContract};
use ph_core::{traits::Id, PhError, PhResult};
use ph_models::{CreateTimesheet, TaskStatus, Timesheet, TimesheetStatus};
use serde::Serialize;
use tracing::{info, instrument};

use crate::context::ServiceContext;

/// CSV header of an export
pub const CSV_HEADER: &str = "Date,Project,Task,Hours,Status,Description";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRef {
    pub id: Id,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRef {
    pub id: Id,
    pub title: String,
    pub status: TaskStatus,
}

/// A time entry with its project and task embedded. Either is `None` when
/// the referenced document no longer exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetView {
    pub id: Id,
    pub user: Id,
    pub project: Option<ProjectRef>,
    pub task: Option<TaskRef>,
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub billable: bool,
    pub status: TimesheetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<Id>,
    pub created_at: DateTime<Utc>,
}

/// A rendered CSV export
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

pub struct TimesheetService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
}

impl<'a> TimesheetService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a CurrentUser) -> Self {
        Self { ctx, user }
    }

    /// The caller's entries, most recent date first
    pub async fn list(&self) -> PhResult<Vec<TimesheetView>> {
        let entries = self.ctx.db.timesheets().for_user(self.user.id).await?;
        self.populate(entries).await
    }

    #[instrument(skip(self, input), fields(user = %self.user.id, project = %input.project))]
    pub async fn create(&self, input: CreateTimesheet) -> PhResult<Timesheet> {
        validate_input(&input)?;

        if !self.ctx.db.projects().exists(input.project).await? {
            return Err(PhError::not_found_with("Project", input.project, "Project not found"));
        }
        let task = match input.task {
            Some(id) => Some(
                self.ctx
                    .db
                    .tasks()
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| PhError::not_found_with("Task", id, "Task not found"))?,
            ),
            None => None,
        };

        let entry = Timesheet::new(self.user.id, input);
        TimesheetContract::new(task.as_ref()).validate(&entry)?;
        self.ctx.db.timesheets().insert(&entry).await?;
        info!(timesheet = %entry.id, hours = entry.hours, "time logged");

        Ok(entry)
    }

    /// The caller's entries as a CSV attachment named after today's date
    pub async fn export(&self) -> PhResult<CsvExport> {
        let entries = self.list().await?;
        Ok(CsvExport {
            filename: format!("timesheets-{}.csv", Utc::now().format("%Y-%m-%d")),
            body: render_csv(&entries),
        })
    }

    async fn populate(&self, entries: Vec<Timesheet>) -> PhResult<Vec<TimesheetView>> {
        let project_ids: Vec<Id> = entries.iter().map(|e| e.project).collect();
        let task_ids: Vec<Id> = entries.iter().filter_map(|e| e.task).collect();

        let projects: HashMap<Id, ProjectRef> = self
            .ctx
            .db
            .projects()
            .find_by_ids(&project_ids)
            .await?
            .into_iter()
            .map(|p| {
                (
                    p.id,
                    ProjectRef {
                        id: p.id,
                        title: p.title,
                        key: p.key,
                    },
                )
            })
            .collect();
        let tasks: HashMap<Id, TaskRef> = self
            .ctx
            .db
            .tasks()
            .find_by_ids(&task_ids)
            .await?
            .into_iter()
            .map(|t| {
                (
                    t.id,
                    TaskRef {
                        id: t.id,
                        title: t.title,
                        status: t.status,
                    },
                )
            })
            .collect();

        Ok(entries
            .into_iter()
            .map(|e| TimesheetView {
                id: e.id,
                user: e.user,
                project: projects.get(&e.project).cloned(),
                task: e.task.and_then(|t| tasks.get(&t).cloned()),
                date: e.date,
                hours: e.hours,
                description: e.description,
                billable: e.billable,
                status: e.status,
                approved_by: e.approved_by,
                created_at: e.created_at,
            })
            .collect())
    }
}

/// Render entries as CSV. Commas inside text become spaces, as do line
/// breaks in descriptions; no quoting is applied.
pub fn render_csv(entries: &[TimesheetView]) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for entry in entries {
        let project = entry
            .project
            .as_ref()
            .map_or_else(|| "N/A".to_string(), |p| p.title.replace(',', " "));
        let task = entry
            .task
            .as_ref()
            .map_or_else(|| "N/A".to_string(), |t| t.title.replace(',', " "));
        let description = entry
            .description
            .as_deref()
            .map(|d| d.replace(',', " ").replace("\r\n", " ").replace('\n', " "))
            .unwrap_or_default();

        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            entry.date.format("%Y-%m-%d"),
            project,
            task,
            entry.hours,
            entry.status.as_str(),
            description
        ));
    }

    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures;
    use ph_core::traits::new_id;
    use ph_models::Role;
    use serde_json::json;

    fn input(value: serde_json::Value) -> CreateTimesheet {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_validates_hours_and_task() {
        let ctx = ServiceContext::in_memory();
        let user = fixtures::user(&ctx, "Ada", Role::Member, new_id()).await;
        let project = fixtures::project(&ctx, &user, vec![]).await;
        let other = fixtures::project(&ctx, &user, vec![]).await;
        let foreign_task = fixtures::task(&ctx, other.id, user.id, json!({})).await;
        let service = TimesheetService::new(&ctx, &user);

        for hours in [0.1, 24.5] {
            let err = service
                .create(input(json!({"project": project.id, "date": "2024-04-02", "hours": hours})))
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.client_message(), "Hours must be between 0.25 and 24");
        }

        let err = service
            .create(input(json!({
                "project": project.id,
                "task": foreign_task.id,
                "date": "2024-04-02",
                "hours": 2
            })))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.client_message(), "Task does not belong to the selected project");

        let err = service
            .create(input(json!({
                "project": project.id,
                "task": new_id(),
                "date": "2024-04-02",
                "hours": 2
            })))
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), "Task not found");

        let err = service
            .create(input(json!({"project": new_id(), "date": "2024-04-02", "hours": 2})))
            .await
            .unwrap_err();
        assert_eq!(err.client_message(), "Project not found");

        let entry = service
            .create(input(json!({"project": project.id, "date": "2024-04-02", "hours": 0.25})))
            .await
            .unwrap();
        assert_eq!(entry.user, user.id);
        assert_eq!(entry.status, TimesheetStatus::Draft);
        assert!(entry.billable);
    }

    #[tokio::test]
    async fn test_list_is_own_entries_newest_first() {
        let ctx = ServiceContext::in_memory();
        let org = new_id();
        let user = fixtures::user(&ctx, "Ada", Role::Member, org).await;
        let other = fixtures::user(&ctx, "Bob", Role::Member, org).await;
        let project = fixtures::project(&ctx, &user, vec![]).await;
        let task = fixtures::task(&ctx, project.id, user.id, json!({"title": "Docs"})).await;

        let service = TimesheetService::new(&ctx, &user);
        service
            .create(input(json!({"project": project.id, "date": "2024-04-01", "hours": 1})))
            .await
            .unwrap();
        service
            .create(input(json!({
                "project": project.id,
                "task": task.id,
                "date": "2024-04-03",
                "hours": 2
            })))
            .await
            .unwrap();
        TimesheetService::new(&ctx, &other)
            .create(input(json!({"project": project.id, "date": "2024-04-02", "hours": 3})))
            .await
            .unwrap();

        let views = service.list().await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].date, NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());
        assert_eq!(views[0].task.as_ref().map(|t| t.title.as_str()), Some("Docs"));
        assert_eq!(views[0].project.as_ref().map(|p| p.title.as_str()), Some("Apollo"));
        assert!(views[1].task.is_none());
    }

    #[tokio::test]
    async fn test_export_csv() {
        let ctx = ServiceContext::in_memory();
        let user = fixtures::user(&ctx, "Ada", Role::Member, new_id()).await;
        let project = fixtures::project(&ctx, &user, vec![]).await;
        let task = fixtures::task(&ctx, project.id, user.id, json!({"title": "Docs, part 1"})).await;

        let service = TimesheetService::new(&ctx, &user);
        service
            .create(input(json!({
                "project": project.id,
                "task": task.id,
                "date": "2024-04-03",
                "hours": 1.5,
                "description": "wrote intro,\nfixed typos"
            })))
            .await
            .unwrap();

        let export = service.export().await.unwrap();
        assert!(export.filename.starts_with("timesheets-"));
        assert!(export.filename.ends_with(".csv"));
        assert_eq!(
            export.body,
            "Date,Project,Task,Hours,Status,Description\n\
             2024-04-03,Apollo,Docs  part 1,1.5,draft,wrote intro  fixed typos\n"
        );
    }

    #[test]
    fn test_missing_references_render_na() {
        let view = TimesheetView {
            id: new_id(),
            user: new_id(),
            project: None,
            task: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            hours: 8.0,
            description: None,
            billable: true,
            status: TimesheetStatus::Submitted,
            approved_by: None,
            created_at: Utc::now(),
        };
        assert_eq!(
            render_csv(&[view]),
            "Date,Project,Task,Hours,Status,Description\n2024-01-02,N/A,N/A,8,submitted,\n"
        );
    }
}
