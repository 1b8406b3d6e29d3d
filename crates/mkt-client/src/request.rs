//! API request building with fulfillment-specific headers.

use std::collections::HashMap;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Result;
use crate::trace::{CorrelationId, RequestId};

/// HTTP request method. Only the shapes this API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Patch => reqwest::Method::PATCH,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Hook mutating the outgoing header set, applied on every attempt.
///
/// Used for the one-off marketplace-token header on resolve calls.
pub type HeaderHook = Box<dyn Fn(&mut HashMap<String, String>) + Send + Sync>;

/// Caller-side options shared by every public operation: optional tracing
/// identifiers and the cancellation signal.
///
/// Missing identifiers are replaced with freshly generated ones before the
/// request leaves the pipeline. The default token is never cancelled.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Per-request identifier; generated when absent.
    pub request_id: Option<RequestId>,
    /// Per-logical-call correlation identifier; generated when absent.
    pub correlation_id: Option<CorrelationId>,
    /// Cancellation signal propagated through retries and pagination.
    pub cancel: CancellationToken,
}

impl CallOptions {
    /// Options with both identifiers left for the pipeline to generate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given request identifier verbatim.
    pub fn with_request_id(mut self, id: RequestId) -> Self {
        self.request_id = Some(id);
        self
    }

    /// Use the given correlation identifier verbatim.
    pub fn with_correlation_id(mut self, id: CorrelationId) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// One fully-specified API request, ready for the executor.
pub struct ApiRequest {
    pub(crate) method: RequestMethod,
    pub(crate) url: Url,
    pub(crate) request_id: RequestId,
    pub(crate) correlation_id: CorrelationId,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<String>,
    pub(crate) header_hook: Option<HeaderHook>,
}

impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("request_id", &self.request_id)
            .field("correlation_id", &self.correlation_id)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("header_hook", &self.header_hook.as_ref().map(|_| "..."))
            .finish()
    }
}

impl ApiRequest {
    /// Create a new request with resolved tracing identifiers.
    pub fn new(
        method: RequestMethod,
        url: Url,
        request_id: RequestId,
        correlation_id: CorrelationId,
    ) -> Self {
        Self {
            method,
            url,
            request_id,
            correlation_id,
            headers: HashMap::new(),
            body: None,
            header_hook: None,
        }
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Serialize a JSON body. Content-Type is attached by the executor.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Set an already-serialized JSON body.
    pub fn raw_json(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a header-mutation hook, applied after the standard headers on
    /// every attempt.
    pub fn with_header_hook(mut self, hook: HeaderHook) -> Self {
        self.header_hook = Some(hook);
        self
    }

    /// The per-request identifier.
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// The correlation identifier.
    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }
}
