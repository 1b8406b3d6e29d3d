//! Marketplace fulfillment API client.
//!
//! Wraps the core `RequestExecutor` from `mkt-client` and provides typed
//! methods for every fulfillment operation: subscription lifecycle,
//! long-running operations, and purchase-token resolution.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;
use uuid::Uuid;

use relay_mkt_client::{
    parser, ApiRequest, CancellationToken, ClientConfig, CorrelationId, Error, ErrorKind,
    HeaderHook, PagedResult, RequestExecutor, RequestId, RequestMethod, Response, Result,
    TokenProvider, UriBuilder, DEFAULT_API_VERSION, MOCK_API_VERSION,
};

use crate::ledger::OperationLedger;
use crate::result::SubscriptionActionResult;

mod operations;
mod subscriptions;

/// Query parameter carrying the API version on every request.
const API_VERSION_PARAM: &str = "api-version";

/// How list endpoints shape their responses for the configured API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionFormat {
    /// Bare JSON array (mock/legacy API version).
    BareArray,
    /// `{value, nextLink}` envelope (production API version).
    Envelope,
}

impl CollectionFormat {
    fn for_version(version: &str) -> Self {
        if version == MOCK_API_VERSION {
            CollectionFormat::BareArray
        } else {
            CollectionFormat::Envelope
        }
    }
}

/// Client for the marketplace SaaS fulfillment API.
///
/// Stateless apart from configuration; safe to call concurrently. The
/// optional [`OperationLedger`] receives the outcome of delete and
/// plan-change calls.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use relay_mkt_fulfillment::{CallOptions, FulfillmentClient};
///
/// let client = FulfillmentClient::new(
///     "https://marketplaceapi.microsoft.com/api",
///     token_provider,
/// )?;
///
/// let subscriptions = client.list_subscriptions(&CallOptions::new()).await?;
/// ```
#[derive(Clone)]
pub struct FulfillmentClient {
    executor: RequestExecutor,
    base: UriBuilder,
    base_uri: String,
    api_version: String,
    collection_format: CollectionFormat,
    ledger: Option<Arc<dyn OperationLedger>>,
}

impl std::fmt::Debug for FulfillmentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FulfillmentClient")
            .field("base_uri", &self.base_uri)
            .field("api_version", &self.api_version)
            .field("collection_format", &self.collection_format)
            .field("ledger", &self.ledger.as_ref().map(|_| "..."))
            .finish_non_exhaustive()
    }
}

impl FulfillmentClient {
    /// Create a client with default HTTP configuration.
    ///
    /// Fails with `InvalidBaseUri` if `base_uri` is not absolute.
    pub fn new(base_uri: &str, token_provider: Arc<dyn TokenProvider>) -> Result<Self> {
        Self::with_config(base_uri, token_provider, ClientConfig::default())
    }

    /// Create a client with custom HTTP configuration.
    pub fn with_config(
        base_uri: &str,
        token_provider: Arc<dyn TokenProvider>,
        config: ClientConfig,
    ) -> Result<Self> {
        let base = UriBuilder::start(base_uri)?;
        let executor = RequestExecutor::with_config(token_provider, config)?;

        Ok(Self {
            executor,
            base,
            base_uri: base_uri.trim_end_matches('/').to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            collection_format: CollectionFormat::for_version(DEFAULT_API_VERSION),
            ledger: None,
        })
    }

    /// Set the API version. The collection format is re-derived once here,
    /// never per call.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self.collection_format = CollectionFormat::for_version(&self.api_version);
        self
    }

    /// Attach an operation ledger receiving delete/plan-change outcomes.
    pub fn with_ledger(mut self, ledger: Arc<dyn OperationLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// The configured base URI.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// The configured API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The collection format derived from the API version.
    pub fn collection_format(&self) -> CollectionFormat {
        self.collection_format
    }

    /// Build a resource URL under the base URI, with the API version
    /// parameter attached.
    fn resource_url(&self, segments: &[&str]) -> Url {
        let mut builder = self.base.clone();
        for segment in segments {
            builder = builder.add_path(segment);
        }
        builder
            .add_query(API_VERSION_PARAM, &self.api_version)
            .build()
    }

    /// Execute one request through the shared pipeline.
    async fn execute(
        &self,
        method: RequestMethod,
        url: Url,
        request_id: RequestId,
        correlation_id: CorrelationId,
        body: Option<String>,
        header_hook: Option<HeaderHook>,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        let mut request = ApiRequest::new(method, url, request_id, correlation_id);
        if let Some(body) = body {
            request = request.raw_json(body);
        }
        if let Some(hook) = header_hook {
            request = request.with_header_hook(hook);
        }
        self.executor.execute(request, cancel).await
    }

    /// Drive envelope pagination until the continuation link runs out.
    ///
    /// Each follow-up page gets a fresh RequestId; the CorrelationId stays
    /// fixed so the whole listing traces as one logical call. Order is
    /// preserved and duplicates pass through unchanged.
    async fn collect_pages<T: DeserializeOwned>(
        &self,
        first_page: Url,
        request_id: RequestId,
        correlation_id: CorrelationId,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>> {
        let response = self
            .execute(
                RequestMethod::Get,
                first_page,
                request_id,
                correlation_id,
                None,
                None,
                cancel,
            )
            .await?;
        let mut page: PagedResult<T> = parser::parse_envelope(response).await?;
        let mut items = std::mem::take(&mut page.value);

        loop {
            let Some(link) = page.continuation().map(str::to_string) else {
                break;
            };
            let next_url = Url::parse(&link).map_err(|e| {
                Error::with_source(
                    ErrorKind::Parse(format!("invalid continuation link: {link}")),
                    e,
                )
            })?;

            let response = self
                .execute(
                    RequestMethod::Get,
                    next_url,
                    RequestId::new(),
                    correlation_id,
                    None,
                    None,
                    cancel,
                )
                .await?;
            page = parser::parse_envelope(response).await?;
            items.append(&mut page.value);
        }

        Ok(items)
    }

    /// Record a mutating call's outcome; failures are logged, never raised.
    async fn record_to_ledger(&self, subscription_id: Uuid, outcome: &SubscriptionActionResult) {
        let Some(ledger) = &self.ledger else {
            return;
        };
        if let Err(err) = ledger.record(subscription_id, outcome).await {
            warn!(%subscription_id, error = %err, "operation ledger record failed");
        }
    }
}
