//! Organization analytics
//!
//! All reports cover the projects of the caller's organization, or every
//! project when the caller has none.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use ph_auth::CurrentUser;
use ph_core::{traits::Id, PhResult};
use ph_models::{Project, ProjectStatus, Task, TaskStatus};
use serde::Serialize;

use crate::context::ServiceContext;
use crate::dashboard::percent;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub id: Id,
    pub name: String,
    pub status: ProjectStatus,
    pub progress: u32,
    pub total_tasks: usize,
    pub completed_tasks: usize,
}

/// Task counts per status
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskStatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeUtilization {
    pub name: String,
    pub estimated: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverdueStats {
    pub completed: usize,
    pub overdue: usize,
}

pub struct AnalyticsService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
    today: NaiveDate,
}

impl<'a> AnalyticsService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a CurrentUser) -> Self {
        Self {
            ctx,
            user,
            today: Utc::now().date_naive(),
        }
    }

    pub fn on(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Completion per project
    pub async fn projects(&self) -> PhResult<Vec<ProjectProgress>> {
        let (projects, tasks) = self.scope().await?;
        let mut per_project: HashMap<Id, (usize, usize)> = HashMap::new();
        for task in &tasks {
            let entry = per_project.entry(task.project).or_default();
            entry.0 += 1;
            if task.is_done() {
                entry.1 += 1;
            }
        }

        Ok(projects
            .into_iter()
            .map(|p| {
                let (total, done) = per_project.get(&p.id).copied().unwrap_or_default();
                ProjectProgress {
                    id: p.id,
                    name: p.title,
                    status: p.status,
                    progress: if total == 0 { 0 } else { percent(done, total) },
                    total_tasks: total,
                    completed_tasks: done,
                }
            })
            .collect())
    }

    pub async fn tasks(&self) -> PhResult<TaskStatusCounts> {
        let (_, tasks) = self.scope().await?;
        Ok(tasks.iter().fold(TaskStatusCounts::default(), |mut c, t| {
            match t.status {
                TaskStatus::Todo => c.todo += 1,
                TaskStatus::InProgress => c.in_progress += 1,
                TaskStatus::Review => c.review += 1,
                TaskStatus::Done => c.done += 1,
            }
            c
        }))
    }

    /// Estimated task hours against logged timesheet hours, per project
    pub async fn time(&self) -> PhResult<Vec<TimeUtilization>> {
        let (projects, tasks) = self.scope().await?;
        let ids: Vec<Id> = projects.iter().map(|p| p.id).collect();
        let entries = self.ctx.db.timesheets().in_projects(&ids).await?;

        let mut estimated: HashMap<Id, f64> = HashMap::new();
        for task in &tasks {
            *estimated.entry(task.project).or_default() += task.estimated_hours.unwrap_or(0.0);
        }
        let mut actual: HashMap<Id, f64> = HashMap::new();
        for entry in &entries {
            *actual.entry(entry.project).or_default() += entry.hours;
        }

        Ok(projects
            .into_iter()
            .map(|p| TimeUtilization {
                estimated: estimated.get(&p.id).copied().unwrap_or(0.0),
                actual: actual.get(&p.id).copied().unwrap_or(0.0),
                name: p.title,
            })
            .collect())
    }

    pub async fn overdue(&self) -> PhResult<OverdueStats> {
        let (_, tasks) = self.scope().await?;
        Ok(OverdueStats {
            completed: tasks.iter().filter(|t| t.is_done()).count(),
            overdue: tasks.iter().filter(|t| t.is_overdue(self.today)).count(),
        })
    }

    async fn scope(&self) -> PhResult<(Vec<Project>, Vec<Task>)> {
        let projects = self
            .ctx
            .db
            .projects()
            .in_organization(self.user.organization)
            .await?;
        let ids: Vec<Id> = projects.iter().map(|p| p.id).collect();
        let tasks = self.ctx.db.tasks().in_projects(&ids).await?;
        Ok((projects, tasks))
    }
}
