//! Header-derived results of acknowledged (non-payload) calls.

use relay_mkt_client::{Response, CORRELATION_ID_HEADER, REQUEST_ID_HEADER};
use uuid::Uuid;

/// Result of an acknowledged call with no response payload (activate).
///
/// Carries the HTTP status and the tracing identifiers echoed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FulfillmentResult {
    pub status: u16,
    pub request_id: Option<String>,
    pub correlation_id: Option<String>,
}

impl FulfillmentResult {
    pub(crate) fn from_response(response: &Response) -> Self {
        Self {
            status: response.status(),
            request_id: response.header(REQUEST_ID_HEADER).map(str::to_string),
            correlation_id: response.header(CORRELATION_ID_HEADER).map(str::to_string),
        }
    }
}

/// Result of a mutating call that starts a long-running operation
/// (delete, plan change, quantity change).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionActionResult {
    pub status: u16,
    pub request_id: Option<String>,
    pub correlation_id: Option<String>,
    /// URL of the operation created to track the action.
    pub operation_location: Option<String>,
}

impl SubscriptionActionResult {
    pub(crate) fn from_response(response: &Response) -> Self {
        Self {
            status: response.status(),
            request_id: response.header(REQUEST_ID_HEADER).map(str::to_string),
            correlation_id: response.header(CORRELATION_ID_HEADER).map(str::to_string),
            operation_location: response.operation_location().map(str::to_string),
        }
    }

    /// The operation id embedded in the operation location, when present.
    pub fn operation_id(&self) -> Option<Uuid> {
        let location = self.operation_location.as_deref()?;
        let path = location.split(['?', '#']).next()?;
        let segment = path.trim_end_matches('/').rsplit('/').next()?;
        Uuid::parse_str(segment).ok()
    }
}
