//! Role-based access control
//!
//! Access is decided by the caller's global role alone. Each route names the
//! roles it admits; the lists live in [`allow`].

use ph_core::{traits::Id, PhError, PhResult};
use ph_models::{Role, User};
use serde::Serialize;

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Id>,
}

impl CurrentUser {
    pub fn new(id: Id, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            organization: None,
        }
    }

    pub fn with_organization(mut self, organization: Id) -> Self {
        self.organization = Some(organization);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check if the user holds one of the given roles
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            organization: user.organization,
        }
    }
}

/// Per-route role allow-lists
pub mod allow {
    use ph_models::Role;

    pub const PROJECT_WRITE: &[Role] = &[Role::Admin, Role::ProjectManager, Role::TeamLead];
    pub const PROJECT_DELETE: &[Role] = &[Role::Admin, Role::ProjectManager];
    pub const MILESTONE_WRITE: &[Role] = &[Role::Admin, Role::ProjectManager, Role::TeamLead];
    pub const MILESTONE_DELETE: &[Role] = &[Role::Admin, Role::ProjectManager];
    pub const ADMIN_DASHBOARD: &[Role] = &[Role::Admin];
    pub const PM_DASHBOARD: &[Role] = &[Role::ProjectManager, Role::Admin, Role::TeamLead];
}

/// Fail with 403 unless the user holds one of `allowed`
pub fn authorize(user: &CurrentUser, allowed: &[Role]) -> PhResult<()> {
    if user.has_any_role(allowed) {
        return Ok(());
    }

    let roles = allowed
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Err(PhError::forbidden(format!(
        "Access denied. Required roles: {}",
        roles
    )))
}
