//! Subscription resources and activation/resolve payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Provisioning,
    Subscribed,
    Suspended,
    Unsubscribed,
    NotStarted,
    PendingFulfillmentStart,
}

/// Session mode reported by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    None,
    DryRun,
}

/// Operations the customer is permitted to perform on the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerOperation {
    Read,
    Update,
    Delete,
}

/// The tenant that receives the subscription's benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    pub tenant_id: Uuid,
}

/// The tenant that purchased the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchaser {
    pub tenant_id: Uuid,
}

/// Billing term of a subscription (trial or paid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_unit: Option<String>,
}

/// A marketplace subscription.
///
/// Materialized from get/activate/resolve responses and never mutated
/// locally; re-fetch to observe server state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Subscription identity.
    pub id: Uuid,
    /// Display name chosen by the purchaser.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub publisher_id: Option<String>,
    #[serde(default)]
    pub offer_id: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub beneficiary: Option<Beneficiary>,
    #[serde(default)]
    pub purchaser: Option<Purchaser>,
    /// True while the customer subscription is in free trial.
    #[serde(default)]
    pub is_free_trial: bool,
    pub saas_subscription_status: SubscriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_mode: Option<SessionMode>,
    #[serde(default)]
    pub allowed_customer_operations: Vec<CustomerOperation>,
    /// Trial term, when the subscription is in one.
    #[serde(default, rename = "term", skip_serializing_if = "Option::is_none")]
    pub trial_term: Option<Term>,
}

/// Activation payload: the plan (and optionally quantity) the publisher
/// commits the subscription to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivatedSubscription {
    pub plan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Result of resolving a one-time purchase token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSubscription {
    pub id: Uuid,
    #[serde(default)]
    pub subscription_name: Option<String>,
    #[serde(default)]
    pub offer_id: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    /// The full subscription, embedded by the production API version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
}
