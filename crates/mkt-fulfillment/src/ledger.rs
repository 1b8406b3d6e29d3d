//! Audit/idempotency ledger for mutating calls.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::SubscriptionActionResult;

/// Error reported by a ledger implementation.
///
/// Recording is best-effort: the fulfillment client logs this and never
/// fails the originating call over it.
#[derive(Debug, thiserror::Error)]
#[error("ledger error: {0}")]
pub struct LedgerError(pub String);

/// Receives a record of each mutating call's outcome.
///
/// Implementations own their storage and concurrency discipline; the
/// fulfillment client treats this as an opaque capability.
#[async_trait]
pub trait OperationLedger: Send + Sync {
    /// Persist the outcome of a mutating call on the given subscription.
    async fn record(
        &self,
        subscription_id: Uuid,
        outcome: &SubscriptionActionResult,
    ) -> Result<(), LedgerError>;
}
