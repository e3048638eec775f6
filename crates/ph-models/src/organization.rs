//! Organization model (tenant boundary)
//!
//! Collection: organizations

use chrono::{DateTime, NaiveDate, Utc};
use ph_core::traits::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    #[default]
    Free,
    Pro,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Inactive,
    Cancelled,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub plan: SubscriptionPlan,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSettings {
    pub allow_time_tracking: bool,
    pub default_currency: String,
}

impl Default for OrganizationSettings {
    fn default() -> Self {
        Self {
            allow_time_tracking: true,
            default_currency: "USD".to_string(),
        }
    }
}

/// Organization entity; owns users and projects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Id,
    pub name: String,
    pub owner: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub subscription: Subscription,
    #[serde(default)]
    pub settings: OrganizationSettings,
    pub created_at: DateTime<Utc>,
}

document!(Organization, "organizations", "Organization");

impl Organization {
    pub fn new(name: impl Into<String>, owner: Id) -> Self {
        Self {
            id: ph_core::traits::new_id(),
            name: name.into().trim().to_string(),
            owner,
            domain: None,
            address: None,
            website: None,
            subscription: Subscription {
                start_date: Some(Utc::now().date_naive()),
                ..Default::default()
            },
            settings: OrganizationSettings::default(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_organization_defaults() {
        let org = Organization::new("  Acme  ", ph_core::traits::new_id());
        assert_eq!(org.name, "Acme");
        assert_eq!(org.subscription.plan, SubscriptionPlan::Free);
        assert_eq!(org.subscription.status, SubscriptionStatus::Active);
        assert!(org.settings.allow_time_tracking);
        assert_eq!(org.settings.default_currency, "USD");
    }
}
