//! Demo data
//!
//! One organization ("Demo Corp") with an admin, a project manager, a team
//! lead and a member, two projects and two tasks. Every account uses the
//! password [`DEMO_PASSWORD`].

use chrono::{Duration, Months, NaiveDate, Utc};
use ph_auth::hash_password;
use ph_core::{traits::Id, PhError, PhResult};
use ph_models::{
    CreateProject, CreateTask, Organization, Project, ProjectStatus, Role, SubscriptionPlan, Task,
    TaskPriority, TaskStatus, User,
};
use tracing::{info, instrument};

use crate::context::ServiceContext;

pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_ORGANIZATION: &str = "Demo Corp";

/// Accounts created by [`seed_demo_data`], as (name, email, role)
pub const DEMO_USERS: [(&str, &str, Role); 4] = [
    ("Admin User", "admin@demo.com", Role::Admin),
    ("John Manager", "manager@demo.com", Role::ProjectManager),
    ("Sarah Lead", "lead@demo.com", Role::TeamLead),
    ("Jane Member", "member@demo.com", Role::Member),
];

/// What a seeding run wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub organization: Id,
    pub users: usize,
    pub projects: usize,
    pub tasks: usize,
}

/// Write the demo data set.
///
/// With `reset` every user, organization, project and task is deleted
/// first. Without it, a store that already holds a demo account is left
/// untouched and a conflict is returned.
#[instrument(skip(ctx), fields(backend = ctx.db.backend()))]
pub async fn seed_demo_data(ctx: &ServiceContext, reset: bool) -> PhResult<SeedSummary> {
    if reset {
        clear(ctx).await?;
    } else if ctx.db.users().find_by_email(DEMO_USERS[0].1).await?.is_some() {
        return Err(PhError::conflict("Demo data already present"));
    }

    let password_hash = hash_password(DEMO_PASSWORD)?;
    let today = Utc::now().date_naive();

    let [admin, manager, lead, member] = DEMO_USERS
        .map(|(name, email, role)| User::new(name, email, password_hash.clone(), role));

    let mut organization = Organization::new(DEMO_ORGANIZATION, admin.id);
    organization.subscription.plan = SubscriptionPlan::Pro;
    ctx.db.organizations().insert(&organization).await?;

    let users = [admin, manager, lead, member].map(|u| u.with_organization(organization.id));
    for user in &users {
        ctx.db.users().insert(user).await?;
    }
    let [_, manager, _, member] = &users;

    let website = Project::new(
        CreateProject {
            title: "Website Redesign".into(),
            description: "Overhaul the company website with modern design.".into(),
            status: Some(ProjectStatus::Active),
            start_date: Some(today),
            end_date: today.checked_add_months(Months::new(2)),
            members: vec![manager.id, member.id],
            ..Default::default()
        },
        manager.id,
        organization.id,
    );
    let mobile = Project::new(
        CreateProject {
            title: "Mobile App Support".into(),
            description: "Maintenance for the iOS and Android apps.".into(),
            status: Some(ProjectStatus::Planning),
            start_date: Some(today),
            members: vec![manager.id],
            ..Default::default()
        },
        manager.id,
        organization.id,
    );
    for project in [&website, &mobile] {
        ctx.db.projects().insert(project).await?;
    }

    let tasks = [
        demo_task(
            website.id,
            manager.id,
            member.id,
            "Design Home Page",
            "Create Figma mockups for the new home page.",
            TaskStatus::InProgress,
            TaskPriority::High,
            today + Duration::days(5),
        ),
        demo_task(
            website.id,
            manager.id,
            member.id,
            "Setup React Repo",
            "Initialize the repo with Vite and Tailwind.",
            TaskStatus::Done,
            TaskPriority::Medium,
            today,
        ),
    ];
    for task in &tasks {
        ctx.db.tasks().insert(task).await?;
    }

    let summary = SeedSummary {
        organization: organization.id,
        users: users.len(),
        projects: 2,
        tasks: tasks.len(),
    };
    info!(?summary, "demo data imported");
    Ok(summary)
}

#[allow(clippy::too_many_arguments)]
fn demo_task(
    project: Id,
    reporter: Id,
    assignee: Id,
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: NaiveDate,
) -> Task {
    Task::from_input(
        CreateTask {
            title: title.into(),
            description: Some(description.into()),
            project,
            milestone: None,
            status: Some(status),
            priority: Some(priority),
            task_type: None,
            assignees: vec![assignee],
            due_date: Some(due_date),
            estimated_hours: None,
            actual_hours: None,
            parent_task: None,
            dependencies: vec![],
            tags: vec![],
            order: None,
        },
        reporter,
    )
}

async fn clear(ctx: &ServiceContext) -> PhResult<()> {
    let db = &ctx.db;
    for task in db.tasks().all().await? {
        db.tasks().delete(task.id).await?;
    }
    for project in db.projects().all().await? {
        db.projects().delete(project.id).await?;
    }
    for organization in db.organizations().all().await? {
        db.organizations().delete(organization.id).await?;
    }
    for user in db.users().all().await? {
        db.users().delete(user.id).await?;
    }
    info!("existing users, organizations, projects and tasks deleted");
    Ok(())
}
