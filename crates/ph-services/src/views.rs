//! Response shapes that embed related documents

use ph_core::traits::Id;
use ph_models::User;
use serde::Serialize;

/// Public fields of a user embedded in another document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: Id,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Look up the referenced users of a list of documents in one query
pub(crate) async fn user_refs(
    db: &ph_db::Database,
    ids: impl IntoIterator<Item = Id>,
) -> ph_core::PhResult<std::collections::HashMap<Id, UserRef>> {
    let mut ids: Vec<Id> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();
    let users = db.users().find_by_ids(&ids).await?;
    Ok(users.iter().map(|u| (u.id, UserRef::from(u))).collect())
}
