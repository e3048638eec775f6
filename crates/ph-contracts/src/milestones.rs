//! Milestone contract

use ph_core::error::ValidationErrors;
use ph_models::Milestone;

use crate::base::{require_present, Contract, ValidationResult};

#[derive(Debug, Default)]
pub struct MilestoneContract;

impl Contract<Milestone> for MilestoneContract {
    fn validate(&self, milestone: &Milestone) -> ValidationResult {
        let mut errors = ValidationErrors::new();
        require_present(&mut errors, "title", &milestone.title, "Please add a milestone title");
        errors.into_result()
    }
}
