//! User directory

use ph_core::{traits::Id, PhResult};
use ph_models::{Role, User};
use serde::Serialize;

use crate::context::ServiceContext;

/// Directory entry for a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Every registered user, regardless of organization
    pub async fn list(&self) -> PhResult<Vec<UserSummary>> {
        let users = self.ctx.db.users().all().await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures;
    use ph_core::traits::new_id;

    #[tokio::test]
    async fn test_list_spans_organizations() {
        let ctx = ServiceContext::in_memory();
        fixtures::user(&ctx, "Ada", Role::Admin, new_id()).await;
        fixtures::user(&ctx, "Grace", Role::Member, new_id()).await;

        let users = UserService::new(&ctx).list().await.unwrap();
        assert_eq!(users.len(), 2);
        let json = serde_json::to_value(&users[0]).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "admin");
    }
}
