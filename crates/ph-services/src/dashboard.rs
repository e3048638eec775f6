//! Role-scoped dashboards
//!
//! Every call recomputes its figures from the store. A task is overdue when
//! it is not done and its due date lies strictly before today.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};
use ph_auth::{allow, authorize, CurrentUser};
use ph_core::{traits::Id, PhResult};
use ph_models::{Milestone, MilestoneStatus, Notification, ProjectStatus, Role, Task};
use serde::Serialize;

use crate::context::ServiceContext;

/// Notifications embedded in each dashboard
pub const DASHBOARD_NOTIFICATIONS: usize = 10;

/// Upcoming deadlines shown on the member dashboard
pub const UPCOMING_DEADLINES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectTotals {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleCount {
    pub role: Role,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTotals {
    pub total: usize,
    pub by_role: Vec<RoleCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub on_track_percent: u32,
    pub overdue_tasks: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MilestoneStats {
    pub completed: usize,
    /// Upcoming or active
    pub pending: usize,
    pub overdue: usize,
}

impl MilestoneStats {
    fn of(milestones: &[Milestone]) -> Self {
        milestones.iter().fold(Self::default(), |mut stats, m| {
            match m.status {
                MilestoneStatus::Completed => stats.completed += 1,
                MilestoneStatus::Overdue => stats.overdue += 1,
                status if status.is_pending() => stats.pending += 1,
                _ => {}
            }
            stats
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub projects: ProjectTotals,
    pub users: UserTotals,
    pub health: Health,
    pub milestones: MilestoneStats,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workload {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PmDashboard {
    pub projects: usize,
    pub progress_percent: u32,
    pub overdue_tasks: usize,
    pub workload: Vec<Workload>,
    pub milestones: MilestoneStats,
    pub pending_approvals: u64,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDashboard {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub overdue_tasks: usize,
    pub upcoming_deadlines: Vec<Task>,
    pub logged_hours: f64,
    pub notifications: Vec<Notification>,
}

pub struct DashboardService<'a> {
    ctx: &'a ServiceContext,
    user: &'a CurrentUser,
    today: NaiveDate,
}

impl<'a> DashboardService<'a> {
    pub fn new(ctx: &'a ServiceContext, user: &'a CurrentUser) -> Self {
        Self {
            ctx,
            user,
            today: Utc::now().date_naive(),
        }
    }

    /// Evaluate due dates against `today` instead of the current date
    pub fn on(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Organization-wide figures; admins only
    pub async fn admin(&self) -> PhResult<AdminDashboard> {
        authorize(self.user, allow::ADMIN_DASHBOARD)?;
        let db = &self.ctx.db;

        let projects = db.projects().in_organization(self.user.organization).await?;
        let project_ids: Vec<Id> = projects.iter().map(|p| p.id).collect();
        let totals = ProjectTotals {
            total: projects.len(),
            active: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Active)
                .count(),
            completed: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Completed)
                .count(),
        };

        let users = db.users().in_organization(self.user.organization).await?;
        let by_role = Role::ALL
            .iter()
            .map(|role| RoleCount {
                role: *role,
                count: users.iter().filter(|u| u.role == *role).count(),
            })
            .filter(|rc| rc.count > 0)
            .collect();

        let tasks = db.tasks().in_projects(&project_ids).await?;
        let open = tasks.iter().filter(|t| !t.is_done()).count();
        let overdue = self.overdue(&tasks);
        let on_track_percent = if open == 0 {
            100
        } else {
            percent(open - overdue, open)
        };

        let milestones = db.milestones().in_projects(&project_ids).await?;

        Ok(AdminDashboard {
            projects: totals,
            users: UserTotals {
                total: users.len(),
                by_role,
            },
            health: Health {
                on_track_percent,
                overdue_tasks: overdue,
            },
            milestones: MilestoneStats::of(&milestones),
            notifications: self.notifications().await?,
        })
    }

    /// Figures over the projects the caller manages or belongs to
    pub async fn pm(&self) -> PhResult<PmDashboard> {
        authorize(self.user, allow::PM_DASHBOARD)?;
        let db = &self.ctx.db;

        let projects = db.projects().involving(self.user.id).await?;
        let project_ids: Vec<Id> = projects.iter().map(|p| p.id).collect();
        let tasks = db.tasks().in_projects(&project_ids).await?;

        let done = tasks.iter().filter(|t| t.is_done()).count();
        let progress_percent = if tasks.is_empty() {
            0
        } else {
            percent(done, tasks.len())
        };

        let milestones = db.milestones().in_projects(&project_ids).await?;

        Ok(PmDashboard {
            projects: projects.len(),
            progress_percent,
            overdue_tasks: self.overdue(&tasks),
            workload: self.workload(&tasks).await?,
            milestones: MilestoneStats::of(&milestones),
            pending_approvals: db.timesheets().count_submitted(&project_ids).await?,
            notifications: self.notifications().await?,
        })
    }

    /// Figures over the tasks assigned to the caller
    pub async fn member(&self) -> PhResult<MemberDashboard> {
        let tasks = self.ctx.db.tasks().assigned_to(self.user.id).await?;

        let upcoming_deadlines = tasks
            .iter()
            .filter(|t| !t.is_done() && t.due_date.map_or(false, |due| due >= self.today))
            .take(UPCOMING_DEADLINES)
            .cloned()
            .collect();

        Ok(MemberDashboard {
            total_tasks: tasks.len(),
            completed_tasks: tasks.iter().filter(|t| t.is_done()).count(),
            overdue_tasks: self.overdue(&tasks),
            upcoming_deadlines,
            logged_hours: tasks.iter().map(|t| t.actual_hours).sum(),
            notifications: self.notifications().await?,
        })
    }

    fn overdue(&self, tasks: &[Task]) -> usize {
        tasks.iter().filter(|t| t.is_overdue(self.today)).count()
    }

    /// Tasks per assignee, busiest first. Assignees that no longer exist are
    /// skipped.
    async fn workload(&self, tasks: &[Task]) -> PhResult<Vec<Workload>> {
        let mut counts: BTreeMap<Id, usize> = BTreeMap::new();
        for assignee in tasks.iter().flat_map(|t| t.assignees.iter()) {
            *counts.entry(*assignee).or_default() += 1;
        }

        let ids: Vec<Id> = counts.keys().copied().collect();
        let names: HashMap<Id, String> = self
            .ctx
            .db
            .users()
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect();

        let mut workload: Vec<Workload> = counts
            .into_iter()
            .filter_map(|(id, count)| {
                names.get(&id).map(|name| Workload {
                    name: name.clone(),
                    count,
                })
            })
            .collect();
        workload.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        Ok(workload)
    }

    async fn notifications(&self) -> PhResult<Vec<Notification>> {
        Ok(self
            .ctx
            .db
            .notifications()
            .latest_for(self.user.id, DASHBOARD_NOTIFICATIONS)
            .await?)
    }
}

/// `part / whole` as a rounded percentage; `whole` must be non-zero
pub(crate) fn percent(part: usize, whole: usize) -> u32 {
    ((part as f64 / whole as f64) * 100.0).round() as u32
}
