//! Available plans for a subscription.

use serde::{Deserialize, Serialize};

/// One plan the subscription may move to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub plan_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_private: bool,
}

/// Payload of `listAvailablePlans`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlans {
    #[serde(default)]
    pub plans: Vec<Plan>,
}
