//! Typed result parsing for API responses.
//!
//! Three response shapes exist: a single JSON object, a bare JSON array
//! (mock/legacy API version), and the `{value, nextLink}` collection
//! envelope (production API version). Endpoint callers pick the shape per
//! the configured API version; the dispatch is fixed, not discovered.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, FieldError, Result};
use crate::response::Response;

/// One page of a collection response, carrying the continuation link.
///
/// A missing, null, or empty `nextLink` means the collection is exhausted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// The raw collection for this page, in server order.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Continuation link; its presence is the sole signal to keep paging.
    #[serde(rename = "nextLink", default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

impl<T> PagedResult<T> {
    /// Returns the continuation link when another page must be fetched.
    pub fn continuation(&self) -> Option<&str> {
        match self.next_link.as_deref() {
            Some(link) if !link.is_empty() => Some(link),
            _ => None,
        }
    }
}

/// Parse the body as a single JSON object.
pub async fn parse_one<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = success_body(response).await?;
    serde_json::from_str(&body).map_err(Into::into)
}

/// Parse the body as a bare JSON array (mock/legacy API version).
pub async fn parse_many<T: DeserializeOwned>(response: Response) -> Result<Vec<T>> {
    let body = success_body(response).await?;
    serde_json::from_str(&body).map_err(Into::into)
}

/// Parse the body as a `{value, nextLink}` envelope (production API version).
pub async fn parse_envelope<T: DeserializeOwned>(response: Response) -> Result<PagedResult<T>> {
    let body = success_body(response).await?;
    serde_json::from_str(&body).map_err(Into::into)
}

/// Gate a response on success, converting a failure status into a
/// structured `Api` error.
pub async fn ensure_success(response: Response) -> Result<Response> {
    if response.is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(error_from_body(status, &body))
}

async fn success_body(response: Response) -> Result<String> {
    ensure_success(response).await?.text().await
}

/// Error body in the wrapped `{"error": {...}}` form.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

/// Structured error detail: code, message, and optional per-field errors.
#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    code: String,
    message: String,
    #[serde(default)]
    details: Vec<FieldError>,
}

/// Convert an error-status body into the structured error shape.
///
/// The body is tried as a wrapped error envelope, then as a flat error
/// object; anything else synthesizes a generic message from the status code.
pub fn error_from_body(status: u16, body: &str) -> Error {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        return Error::new(ErrorKind::Api {
            status,
            code: envelope.error.code,
            message: envelope.error.message,
            details: envelope.error.details,
        });
    }

    if let Ok(detail) = serde_json::from_str::<ApiErrorDetail>(body) {
        return Error::new(ErrorKind::Api {
            status,
            code: detail.code,
            message: detail.message,
            details: detail.details,
        });
    }

    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("UnknownStatus");

    Error::new(ErrorKind::Api {
        status,
        code: reason.replace(' ', ""),
        message: format!("marketplace API returned status {status} ({reason})"),
        details: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_error_body_is_parsed() {
        let body = r#"{"error":{"code":"EntityNotFound","message":"Subscription not found","details":[{"code":"Missing","target":"id","message":"unknown id"}]}}"#;
        let err = error_from_body(404, body);

        match err.kind {
            ErrorKind::Api {
                status,
                code,
                message,
                details,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, "EntityNotFound");
                assert_eq!(message, "Subscription not found");
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].target.as_deref(), Some("id"));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn flat_error_body_is_parsed() {
        let body = r#"{"code":"BadArgument","message":"quantity must be positive"}"#;
        let err = error_from_body(400, body);

        match err.kind {
            ErrorKind::Api { status, code, .. } => {
                assert_eq!(status, 400);
                assert_eq!(code, "BadArgument");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn unparsable_error_body_synthesizes_from_status() {
        let err = error_from_body(410, "<html>gone</html>");

        match err.kind {
            ErrorKind::Api {
                status,
                code,
                message,
                details,
            } => {
                assert_eq!(status, 410);
                assert_eq!(code, "Gone");
                assert!(message.contains("410"));
                assert!(details.is_empty());
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn empty_error_body_synthesizes_from_status() {
        let err = error_from_body(404, "");
        match err.kind {
            ErrorKind::Api { status, code, .. } => {
                assert_eq!(status, 404);
                assert_eq!(code, "NotFound");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn envelope_deserializes_with_and_without_next_link() {
        let page: PagedResult<serde_json::Value> =
            serde_json::from_str(r#"{"value":[{"id":1}],"nextLink":"https://x/page2"}"#).unwrap();
        assert_eq!(page.value.len(), 1);
        assert_eq!(page.continuation(), Some("https://x/page2"));

        let page: PagedResult<serde_json::Value> =
            serde_json::from_str(r#"{"value":[],"nextLink":null}"#).unwrap();
        assert!(page.continuation().is_none());

        let page: PagedResult<serde_json::Value> = serde_json::from_str(r#"{"value":[]}"#).unwrap();
        assert!(page.continuation().is_none());
    }

    #[test]
    fn empty_next_link_does_not_continue() {
        let page: PagedResult<serde_json::Value> =
            serde_json::from_str(r#"{"value":[],"nextLink":""}"#).unwrap();
        assert!(page.continuation().is_none());
    }

    #[test]
    fn missing_value_defaults_to_empty() {
        let page: PagedResult<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(page.value.is_empty());
    }
}
