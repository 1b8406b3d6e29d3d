//! # relay-mkt-api
//!
//! A marketplace SaaS fulfillment API client library for Rust.
//!
//! This library provides type-safe access to the fulfillment API with
//! built-in authentication, tracing-header propagation, retry logic, and
//! pagination.
//!
//! ## Crates
//!
//! - **relay-mkt-client** - Core HTTP pipeline: auth, tracing headers,
//!   transient-failure retry, typed result parsing
//! - **relay-mkt-auth** - Bearer-token acquisition: client-credentials flow
//!   with token caching
//! - **relay-mkt-fulfillment** - API surface: subscriptions, long-running
//!   operations, purchase-token resolution
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use relay_mkt_api::auth::{ClientCredentialsProvider, MarketplaceCredentials};
//! use relay_mkt_api::fulfillment::{CallOptions, FulfillmentClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = MarketplaceCredentials::from_env()?;
//!     let provider = Arc::new(ClientCredentialsProvider::new(credentials));
//!
//!     let client = FulfillmentClient::new(
//!         "https://marketplaceapi.microsoft.com/api",
//!         provider,
//!     )?;
//!
//!     for subscription in client.list_subscriptions(&CallOptions::new()).await? {
//!         println!("{} {:?}", subscription.id, subscription.saas_subscription_status);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export member crates for convenient access
#[cfg(feature = "auth")]
pub use relay_mkt_auth as auth;
#[cfg(feature = "client")]
pub use relay_mkt_client as client;
#[cfg(feature = "fulfillment")]
pub use relay_mkt_fulfillment as fulfillment;
