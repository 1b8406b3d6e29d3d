//! # mkt-fulfillment
//!
//! Typed surface of the marketplace SaaS fulfillment API.
//!
//! ## Features
//!
//! - **Subscriptions** - activate, get, list (with pagination), delete,
//!   plan and quantity changes
//! - **Operations** - track and acknowledge long-running actions
//! - **Resolve** - exchange a one-time purchase token for its subscription
//! - **Operation ledger** - optional audit hook for mutating calls
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use relay_mkt_auth::{ClientCredentialsProvider, MarketplaceCredentials};
//! use relay_mkt_fulfillment::{CallOptions, FulfillmentClient, OperationUpdate};
//!
//! #[tokio::main]
//! async fn main() -> relay_mkt_fulfillment::Result<()> {
//!     let credentials = MarketplaceCredentials::from_env().expect("credentials");
//!     let provider = Arc::new(ClientCredentialsProvider::new(credentials));
//!
//!     let client = FulfillmentClient::new(
//!         "https://marketplaceapi.microsoft.com/api",
//!         provider,
//!     )?;
//!
//!     // Resolve the landing-page token, then activate
//!     let resolved = client
//!         .resolve_subscription("<token from landing page>", &CallOptions::new())
//!         .await?;
//!
//!     for subscription in client.list_subscriptions(&CallOptions::new()).await? {
//!         println!("{} {:?}", subscription.id, subscription.saas_subscription_status);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod ledger;
mod operation;
mod plan;
mod result;
mod subscription;

// Main client
pub use client::{CollectionFormat, FulfillmentClient};

// Ledger capability
pub use ledger::{LedgerError, OperationLedger};

// Data-transfer objects
pub use operation::{
    OperationAction, OperationStatus, OperationUpdate, OperationUpdateStatus,
    SubscriptionOperation,
};
pub use plan::{Plan, SubscriptionPlans};
pub use result::{FulfillmentResult, SubscriptionActionResult};
pub use subscription::{
    ActivatedSubscription, Beneficiary, CustomerOperation, Purchaser, ResolvedSubscription,
    SessionMode, Subscription, SubscriptionStatus, Term,
};

// The endpoint layer introduces no error categories of its own; the core
// taxonomy is the public one.
pub use relay_mkt_client::{
    CallOptions, CancellationToken, ClientConfig, ClientConfigBuilder, CorrelationId, Error,
    ErrorKind, FieldError, PagedResult, RequestId, Result, RetryConfig, TokenProvider,
    DEFAULT_API_VERSION, MOCK_API_VERSION,
};
