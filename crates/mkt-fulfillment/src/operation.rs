//! Long-running subscription operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a long-running operation is doing to the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationAction {
    Reinstate,
    ChangePlan,
    ChangeQuantity,
    Suspend,
    Unsubscribe,
    Renew,
}

/// Server-side progress of a long-running operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    NotStarted,
    InProgress,
    Succeeded,
    Failed,
    Conflict,
}

/// A long-running action record tied to one subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionOperation {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<Uuid>,
    #[serde(default)]
    pub offer_id: Option<String>,
    #[serde(default)]
    pub publisher_id: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<OperationAction>,
    pub status: OperationStatus,
    #[serde(default, rename = "timeStamp", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Outcome the publisher reports for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationUpdateStatus {
    Success,
    Failure,
}

/// PATCH body acknowledging a long-running operation.
///
/// No local validation beyond required-field presence; the server is
/// authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationUpdate {
    pub status: OperationUpdateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationUpdate {
    /// Acknowledge success.
    pub fn success() -> Self {
        Self {
            status: OperationUpdateStatus::Success,
            message: None,
        }
    }

    /// Report failure.
    pub fn failure() -> Self {
        Self {
            status: OperationUpdateStatus::Failure,
            message: None,
        }
    }

    /// Attach an operation-specific message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
