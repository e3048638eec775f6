//! Notification events
//!
//! Each event knows its recipients and renders the title, message and link
//! shown to them.

use ph_core::traits::Id;
use ph_models::{Notification, NotificationType, TaskStatus};

/// Something that happened which users should hear about
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// A project was created; the creator and every added member hear of it
    ProjectCreated {
        project: Id,
        title: String,
        actor: Id,
        members: Vec<Id>,
    },
    /// A task was created; assignees and the project manager hear of it
    TaskCreated {
        task: Id,
        title: String,
        project_title: String,
        project_manager: Id,
        assignees: Vec<Id>,
        actor: Id,
    },
    /// The status of a task changed; the reporter hears of it
    TaskStatusChanged {
        task: Id,
        title: String,
        status: TaskStatus,
        reporter: Id,
        actor: Id,
    },
    /// The assignee list of a task changed
    TaskAssigned {
        task: Id,
        title: String,
        assignees: Vec<Id>,
        actor: Id,
    },
    /// Users were mentioned in a task comment
    Mentioned {
        task: Id,
        title: String,
        actor_name: String,
        mentioned: Vec<Id>,
        actor: Id,
    },
    /// Somebody replied to a comment
    CommentReply {
        task: Id,
        title: String,
        actor_name: String,
        parent_author: Id,
        actor: Id,
    },
}

fn task_link(task: Id) -> String {
    format!("/tasks/{}", task)
}

fn project_link(project: Id) -> String {
    format!("/projects/{}", project)
}

impl NotificationEvent {
    /// The user that caused the event
    pub fn actor(&self) -> Id {
        match self {
            Self::ProjectCreated { actor, .. }
            | Self::TaskCreated { actor, .. }
            | Self::TaskStatusChanged { actor, .. }
            | Self::TaskAssigned { actor, .. }
            | Self::Mentioned { actor, .. }
            | Self::CommentReply { actor, .. } => *actor,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ProjectCreated { .. } => "project_created",
            Self::TaskCreated { .. } => "task_created",
            Self::TaskStatusChanged { .. } => "task_status_changed",
            Self::TaskAssigned { .. } => "task_assigned",
            Self::Mentioned { .. } => "mentioned",
            Self::CommentReply { .. } => "comment_reply",
        }
    }

    /// Render one notification per recipient
    pub fn notifications(&self) -> Vec<Notification> {
        let actor = self.actor();
        let build = |recipient: Id, kind: NotificationType, title: &str, message: String, link: String| {
            Notification::new(recipient, kind, title, message)
                .with_sender(actor)
                .with_link(link)
        };

        match self {
            Self::ProjectCreated {
                project,
                title,
                members,
                ..
            } => {
                let mut out = vec![build(
                    actor,
                    NotificationType::ProjectUpdate,
                    "Project Created",
                    format!("New project \"{}\" has been successfully created.", title),
                    project_link(*project),
                )];
                out.extend(members.iter().filter(|m| **m != actor).map(|member| {
                    build(
                        *member,
                        NotificationType::ProjectUpdate,
                        "Added to Project",
                        format!("You have been added to the project: {}", title),
                        project_link(*project),
                    )
                }));
                out
            }
            Self::TaskCreated {
                task,
                title,
                project_title,
                project_manager,
                assignees,
                ..
            } => {
                let mut out: Vec<Notification> = assignees
                    .iter()
                    .map(|assignee| {
                        build(
                            *assignee,
                            NotificationType::TaskAssignment,
                            "New Task Assigned",
                            format!(
                                "Task \"{}\" has been assigned to you in project \"{}\"",
                                title, project_title
                            ),
                            task_link(*task),
                        )
                    })
                    .collect();
                if *project_manager != actor {
                    out.push(build(
                        *project_manager,
                        NotificationType::ProjectUpdate,
                        "New Task Created",
                        format!(
                            "A new task \"{}\" was created in your project: {}",
                            title, project_title
                        ),
                        task_link(*task),
                    ));
                }
                out
            }
            Self::TaskStatusChanged {
                task,
                title,
                status,
                reporter,
                ..
            } => vec![build(
                *reporter,
                NotificationType::ProjectUpdate,
                "Task Status Updated",
                format!("{} is now {}", title, status.label()),
                task_link(*task),
            )],
            Self::TaskAssigned {
                task,
                title,
                assignees,
                ..
            } => assignees
                .iter()
                .filter(|a| **a != actor)
                .map(|assignee| {
                    build(
                        *assignee,
                        NotificationType::TaskAssignment,
                        "Task Assigned",
                        format!("You were assigned to: {}", title),
                        task_link(*task),
                    )
                })
                .collect(),
            Self::Mentioned {
                task,
                title,
                actor_name,
                mentioned,
                ..
            } => mentioned
                .iter()
                .filter(|m| **m != actor)
                .map(|user| {
                    build(
                        *user,
                        NotificationType::Mention,
                        "You were mentioned",
                        format!("{} mentioned you in: {}", actor_name, title),
                        task_link(*task),
                    )
                })
                .collect(),
            Self::CommentReply {
                task,
                title,
                actor_name,
                parent_author,
                ..
            } => {
                if *parent_author == actor {
                    return vec![];
                }
                vec![build(
                    *parent_author,
                    NotificationType::CommentReply,
                    "New Reply",
                    format!("{} replied to your comment on: {}", actor_name, title),
                    task_link(*task),
                )]
            }
        }
    }
}
