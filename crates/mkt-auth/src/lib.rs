//! # mkt-auth
//!
//! Bearer-token acquisition for the marketplace fulfillment API.
//!
//! ## Security
//!
//! - Client secrets and access tokens are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Error messages avoid credential values
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use relay_mkt_auth::{ClientCredentialsProvider, MarketplaceCredentials};
//!
//! # async fn example() -> relay_mkt_auth::Result<()> {
//! let credentials = MarketplaceCredentials::from_env()?;
//! let provider = Arc::new(ClientCredentialsProvider::new(credentials));
//! // hand `provider` to the fulfillment client as its TokenProvider
//! # Ok(())
//! # }
//! ```

mod client_credentials;
mod credentials;
mod error;

pub use client_credentials::{ClientCredentialsProvider, TokenResponse};
pub use credentials::MarketplaceCredentials;
pub use error::{Error, ErrorKind, Result};

/// Default token authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Audience resource of the marketplace fulfillment API.
pub const MARKETPLACE_RESOURCE: &str = "20e940b3-4c77-4b0b-9a53-9e16a1b010a7";
