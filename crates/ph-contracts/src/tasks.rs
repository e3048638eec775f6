//! Task contracts
//!
//! [`TaskTransitionContract`] gates status changes on the state of related
//! tasks. [`TaskContract`] checks the task document itself.

use ph_core::error::{ContractError, ValidationErrors};
use ph_models::{Task, TaskStatus};

use crate::base::{require_present, Contract, ValidationResult};

/// Workflow guard for a status submitted in a task update.
///
/// `dependencies` are the tasks listed in the task's `dependencies` that
/// still exist; `subtasks` are the tasks whose `parentTask` is this task.
pub struct TaskTransitionContract<'a> {
    dependencies: &'a [Task],
    subtasks: &'a [Task],
}

impl<'a> TaskTransitionContract<'a> {
    pub fn new(dependencies: &'a [Task], subtasks: &'a [Task]) -> Self {
        Self {
            dependencies,
            subtasks,
        }
    }

    /// Check that the task may move to `target`
    pub fn check(&self, target: TaskStatus) -> Result<(), ContractError> {
        match target {
            TaskStatus::Done => {
                let open = open_titles(self.dependencies);
                if !open.is_empty() {
                    return Err(ContractError::Base {
                        message: format!(
                            "Cannot complete task. Prerequisite tasks are incomplete: {}",
                            open.join(", ")
                        ),
                    });
                }

                let open_subtasks = self.subtasks.iter().filter(|t| !t.is_done()).count();
                if open_subtasks > 0 {
                    return Err(ContractError::Base {
                        message: format!(
                            "Cannot complete parent task. {} sub-tasks are still open.",
                            open_subtasks
                        ),
                    });
                }

                Ok(())
            }
            TaskStatus::InProgress => {
                let open = open_titles(self.dependencies);
                if open.is_empty() {
                    Ok(())
                } else {
                    Err(ContractError::Base {
                        message: format!(
                            "Cannot start task. Dependencies are incomplete: {}",
                            open.join(", ")
                        ),
                    })
                }
            }
            TaskStatus::Todo | TaskStatus::Review => Ok(()),
        }
    }

    /// Whether a status requires the related tasks to be loaded at all
    pub fn is_guarded(target: TaskStatus) -> bool {
        matches!(target, TaskStatus::Done | TaskStatus::InProgress)
    }
}

fn open_titles(tasks: &[Task]) -> Vec<&str> {
    tasks
        .iter()
        .filter(|t| !t.is_done())
        .map(|t| t.title.as_str())
        .collect()
}

/// Field rules for a task document
#[derive(Debug, Default)]
pub struct TaskContract;

impl Contract<Task> for TaskContract {
    fn validate(&self, task: &Task) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        require_present(&mut errors, "title", &task.title, "Please add a task title");

        if task.estimated_hours.map_or(false, |h| h < 0.0) {
            errors.add("estimatedHours", "Estimated hours cannot be negative");
        }
        if task.actual_hours < 0.0 {
            errors.add("actualHours", "Actual hours cannot be negative");
        }
        if task.parent_task == Some(task.id) {
            errors.add("parentTask", "A task cannot be its own parent");
        }
        if task.dependencies.contains(&task.id) {
            errors.add("dependencies", "A task cannot depend on itself");
        }

        errors.into_result()
    }
}
