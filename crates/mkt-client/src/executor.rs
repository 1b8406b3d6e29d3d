//! Request execution with authentication, tracing headers, and transient
//! failure recovery.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{is_transient_status, Error, ErrorKind, Result};
use crate::request::ApiRequest;
use crate::response::Response;
use crate::retry::RetryPolicy;
use crate::token::TokenProvider;
use crate::trace::{CORRELATION_ID_HEADER, REQUEST_ID_HEADER};

/// Executes one logical API call: resolves a bearer token, attaches tracing
/// headers, sends over the transport, and retries transient failures with
/// bounded backoff. Never interprets payload semantics.
#[derive(Clone)]
pub struct RequestExecutor {
    inner: reqwest::Client,
    config: ClientConfig,
    token_provider: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RequestExecutor {
    /// Create an executor with default configuration.
    pub fn new(token_provider: Arc<dyn TokenProvider>) -> Result<Self> {
        Self::with_config(token_provider, ClientConfig::default())
    }

    /// Create an executor with custom configuration.
    pub fn with_config(
        token_provider: Arc<dyn TokenProvider>,
        config: ClientConfig,
    ) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self {
            inner,
            config,
            token_provider,
        })
    }

    /// Get the executor configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a request, retrying transient failures.
    ///
    /// Retries reuse the request's identifiers so server-side logs correlate
    /// attempts. Cancellation aborts the in-flight call and any backoff
    /// sleep immediately, surfacing `ErrorKind::Cancelled`.
    pub async fn execute(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<Response> {
        let mut retry_policy = self
            .config
            .retry
            .as_ref()
            .map(|c| RetryPolicy::new(c.clone()));

        loop {
            if cancel.is_cancelled() {
                return Err(Error::new(ErrorKind::Cancelled));
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => Err(Error::new(ErrorKind::Cancelled)),
                result = self.execute_once(&request) => result,
            };

            match result {
                Ok(response) => return Ok(response),
                Err(err) if err.is_cancelled() => return Err(err),
                Err(err) if err.is_retryable() => {
                    let Some(policy) = retry_policy.as_mut() else {
                        return Err(err);
                    };

                    let Some(delay) = policy.next_delay(err.retry_after()) else {
                        return Err(Error::with_source(
                            ErrorKind::RetriesExhausted {
                                attempts: policy.attempt(),
                            },
                            err,
                        ));
                    };

                    warn!(
                        attempt = policy.attempt(),
                        delay_ms = delay.as_millis(),
                        request_id = %request.request_id,
                        error = %err,
                        "transient failure, retrying"
                    );

                    tokio::select! {
                        _ = cancel.cancelled() => return Err(Error::new(ErrorKind::Cancelled)),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Execute a single attempt without retry logic.
    async fn execute_once(&self, request: &ApiRequest) -> Result<Response> {
        let token = self.token_provider.get_token().await?;

        let mut req = self
            .inner
            .request(request.method.to_reqwest(), request.url.clone())
            .bearer_auth(&token);

        let mut headers = request.headers.clone();
        headers.insert(
            REQUEST_ID_HEADER.to_string(),
            request.request_id.to_string(),
        );
        headers.insert(
            CORRELATION_ID_HEADER.to_string(),
            request.correlation_id.to_string(),
        );
        if let Some(hook) = &request.header_hook {
            hook(&mut headers);
        }
        for (name, value) in &headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            req = req
                .header("Content-Type", "application/json")
                .body(body.clone());
        }

        if self.config.enable_tracing {
            debug!(
                method = ?request.method,
                url = %request.url,
                request_id = %request.request_id,
                correlation_id = %request.correlation_id,
                "sending request"
            );
        }

        let response = req.send().await?;
        let status = response.status().as_u16();

        if self.config.enable_tracing {
            if response.status().is_success() {
                debug!(status, "response received");
            } else {
                info!(status, "non-success response");
            }
        }

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(std::time::Duration::from_secs);

            return Err(Error::new(ErrorKind::RateLimited { retry_after }));
        }

        if status >= 500 && is_transient_status(status) {
            return Err(Error::new(ErrorKind::Http {
                status,
                message: format!("transient server error: {status}"),
            }));
        }

        Ok(Response::new(response))
    }
}
