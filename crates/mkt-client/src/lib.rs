//! # mkt-client
//!
//! Core HTTP pipeline for the marketplace SaaS fulfillment API.
//!
//! Every fulfillment operation, whatever its endpoint, goes through the same
//! pipeline provided here:
//! - authenticated request construction (bearer token from a [`TokenProvider`])
//! - request/correlation-id propagation (`x-ms-requestid` / `x-ms-correlationid`)
//! - transport execution with bounded-backoff retry of transient failures
//! - typed parsing into success, paged-collection, or structured-error results
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │            Endpoint layer (mkt-fulfillment)    │
//! └────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌────────────────────────────────────────────────┐
//! │ RequestExecutor                                │
//! │  - token resolution + tracing headers          │
//! │  - transient-failure retry with backoff        │
//! │  - cancellation propagation                    │
//! └────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌────────────────────────────────────────────────┐
//! │ parser: parse_one / parse_many / parse_envelope│
//! └────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use relay_mkt_client::{
//!     ApiRequest, RequestExecutor, RequestMethod, StaticTokenProvider, UriBuilder,
//!     parser, CorrelationId, RequestId,
//! };
//!
//! # async fn example() -> relay_mkt_client::Result<()> {
//! let executor = RequestExecutor::new(Arc::new(StaticTokenProvider::new("token")))?;
//!
//! let url = UriBuilder::start("https://marketplaceapi.example.com/api")?
//!     .add_path("subscriptions")
//!     .add_query("api-version", relay_mkt_client::DEFAULT_API_VERSION)
//!     .build();
//!
//! let request = ApiRequest::new(
//!     RequestMethod::Get, url, RequestId::new(), CorrelationId::new(),
//! );
//! let response = executor.execute(request, &Default::default()).await?;
//! let page: parser::PagedResult<serde_json::Value> = parser::parse_envelope(response).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod executor;
pub mod parser;
mod request;
mod response;
mod retry;
mod token;
mod trace;
mod uri;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, FieldError, Result};
pub use executor::RequestExecutor;
pub use parser::PagedResult;
pub use request::{ApiRequest, CallOptions, HeaderHook, RequestMethod};
pub use response::{Response, OPERATION_LOCATION_HEADER};
pub use retry::{BackoffStrategy, RetryConfig, RetryPolicy};
pub use token::{StaticTokenProvider, TokenProvider};
pub use trace::{
    CorrelationId, RequestId, CORRELATION_ID_HEADER, MARKETPLACE_TOKEN_HEADER, REQUEST_ID_HEADER,
};
pub use uri::UriBuilder;

// Re-export the cancellation token type used throughout the pipeline.
pub use tokio_util::sync::CancellationToken;

/// Production API version.
pub const DEFAULT_API_VERSION: &str = "2018-08-31";

/// Mock/legacy API version; list endpoints return bare JSON arrays.
pub const MOCK_API_VERSION: &str = "2018-09-15";

/// User-Agent string for the client.
pub const USER_AGENT: &str = concat!("relay-mkt-api/", env!("CARGO_PKG_VERSION"));
