//! Timesheet contract

use ph_core::error::ValidationErrors;
use ph_models::timesheet::{MAX_HOURS, MIN_HOURS};
use ph_models::{Task, Timesheet};

use crate::base::{Contract, ValidationResult};

/// Checks a time entry against the task it is logged on, if any
pub struct TimesheetContract<'a> {
    task: Option<&'a Task>,
}

impl<'a> TimesheetContract<'a> {
    pub fn new(task: Option<&'a Task>) -> Self {
        Self { task }
    }
}

impl<'a> Contract<Timesheet> for TimesheetContract<'a> {
    fn validate(&self, entry: &Timesheet) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if !(MIN_HOURS..=MAX_HOURS).contains(&entry.hours) {
            errors.add("hours", "Hours must be between 0.25 and 24");
        }

        if let Some(task) = self.task {
            if task.project != entry.project {
                errors.add_base("Task does not belong to the selected project");
            }
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_core::traits::new_id;
    use ph_models::CreateTask;

    fn entry(project: ph_core::traits::Id, hours: f64) -> Timesheet {
        let input = serde_json::from_value(serde_json::json!({
            "project": project,
            "date": "2024-04-02",
            "hours": hours
        }))
        .unwrap();
        Timesheet::new(new_id(), input)
    }

    fn task_in(project: ph_core::traits::Id) -> Task {
        let input: CreateTask =
            serde_json::from_value(serde_json::json!({"title": "T", "project": project})).unwrap();
        Task::from_input(input, new_id())
    }

    #[test]
    fn test_hours_range() {
        let project = new_id();
        let contract = TimesheetContract::new(None);
        assert!(contract.validate(&entry(project, 0.25)).is_ok());
        assert!(contract.validate(&entry(project, 24.0)).is_ok());
        assert!(contract.validate(&entry(project, 0.2)).unwrap_err().has_error("hours"));
        assert!(contract.validate(&entry(project, 25.0)).unwrap_err().has_error("hours"));
    }

    #[test]
    fn test_task_must_belong_to_project() {
        let project = new_id();
        let foreign = task_in(new_id());
        let errors = TimesheetContract::new(Some(&foreign))
            .validate(&entry(project, 2.0))
            .unwrap_err();
        assert_eq!(
            errors.full_messages(),
            vec!["Task does not belong to the selected project".to_string()]
        );

        let own = task_in(project);
        assert!(TimesheetContract::new(Some(&own)).validate(&entry(project, 2.0)).is_ok());
    }
}
