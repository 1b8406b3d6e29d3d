//! Raw HTTP response wrapper.

use std::time::Duration;

use crate::error::Result;

/// Header carrying the URL of a long-running operation created by a
/// mutating call.
pub const OPERATION_LOCATION_HEADER: &str = "operation-location";

/// Wrapper around the transport response: status, headers, body.
///
/// The executor returns this unmodified; payload interpretation belongs to
/// the parser.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Get the Retry-After header as a Duration (seconds form only).
    pub fn retry_after(&self) -> Option<Duration> {
        let value = self.header("retry-after")?;
        value.parse::<u64>().ok().map(Duration::from_secs)
    }

    /// Get the Operation-Location header.
    pub fn operation_location(&self) -> Option<&str> {
        self.header(OPERATION_LOCATION_HEADER)
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }
}
