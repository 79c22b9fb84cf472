//! Error types for the PocketBase client.
//!
//! Every failure produced while talking to the backend is normalized into
//! [`ClientError`]. The accessors on the enum (`status`, `data`, `message`,
//! `is_abort`) give the same view regardless of whether the request failed on
//! the wire, was cancelled, or came back with an error status.

use serde_json::{Map, Value};
use thiserror::Error;

/// Message used when the server did not provide one.
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong while processing your request.";

/// Result type for PocketBase client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while using the PocketBase client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a status >= 400.
    #[error("request to {url} failed with status {status}: {}", response_message(.data))]
    Response {
        /// Final request url.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Parsed JSON error body (usually `{code, message, data}`).
        data: Value,
    },

    /// The request was cancelled, either manually or by auto-cancellation.
    #[error("request to {url} was cancelled")]
    Aborted {
        /// Final request url.
        url: String,
    },

    /// Transport level failure (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The transport rejected the exchange for a reason a retry cannot fix
    /// (redirect loop, malformed response).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The url could not be built or parsed.
    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    /// A header name or value was rejected.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The auth storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Build the 404 error returned when a lookup yields no item.
    pub fn not_found(url: impl Into<String>) -> Self {
        ClientError::Response {
            url: url.into(),
            status: 404,
            data: serde_json::json!({
                "code": 404,
                "message": "The requested resource wasn't found.",
                "data": {},
            }),
        }
    }

    /// HTTP status of the failed request, `0` when no response was received.
    pub fn status(&self) -> u16 {
        match self {
            ClientError::Response { status, .. } => *status,
            _ => 0,
        }
    }

    /// Url of the failed request, if known.
    pub fn url(&self) -> Option<&str> {
        match self {
            ClientError::Response { url, .. } | ClientError::Aborted { url } => Some(url),
            _ => None,
        }
    }

    /// Full response body of a failed request, or `null`.
    pub fn response(&self) -> Value {
        match self {
            ClientError::Response { data, .. } => data.clone(),
            _ => Value::Null,
        }
    }

    /// Field validation errors (`data.data` on PocketBase), or an empty object.
    pub fn data(&self) -> Value {
        match self {
            ClientError::Response { data, .. } => match data.get("data") {
                Some(Value::Object(map)) => Value::Object(map.clone()),
                _ => Value::Object(Map::new()),
            },
            _ => Value::Object(Map::new()),
        }
    }

    /// Human readable message, preferring the one sent by the server.
    pub fn message(&self) -> String {
        match self {
            ClientError::Response { data, .. } => response_message(data),
            ClientError::Aborted { .. } => "The request was autocancelled.".to_string(),
            _ => DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether the request was cancelled.
    pub fn is_abort(&self) -> bool {
        matches!(self, ClientError::Aborted { .. })
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(_) => true,
            ClientError::Response { status, .. } => {
                crate::client::is_retryable_status(*status)
            }
            _ => false,
        }
    }
}

fn response_message(data: &Value) -> String {
    data.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_ERROR_MESSAGE)
        .to_string()
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ClientError::InvalidUrl(err.to_string())
        } else if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            ClientError::Http(err.to_string())
        } else {
            ClientError::Protocol(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_error_accessors() {
        let err = ClientError::Response {
            url: "http://127.0.0.1:8090/api/collections/posts/records".into(),
            status: 400,
            data: json!({
                "code": 400,
                "message": "Failed to create record.",
                "data": {"title": {"code": "validation_required", "message": "Missing required value."}}
            }),
        };

        assert_eq!(err.status(), 400);
        assert_eq!(err.message(), "Failed to create record.");
        assert_eq!(err.data()["title"]["code"], "validation_required");
        assert!(!err.is_abort());
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("Failed to create record."));
    }

    #[test]
    fn test_not_found_payload() {
        let err = ClientError::not_found("http://localhost/api/admins");
        assert_eq!(err.status(), 404);
        assert_eq!(err.message(), "The requested resource wasn't found.");
        assert_eq!(err.data(), json!({}));
    }

    #[test]
    fn test_transport_error_defaults() {
        let err = ClientError::Http("connection refused".into());
        assert_eq!(err.status(), 0);
        assert_eq!(err.message(), DEFAULT_ERROR_MESSAGE);
        assert_eq!(err.response(), Value::Null);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_aborted_error() {
        let err = ClientError::Aborted { url: "http://localhost/api/health".into() };
        assert!(err.is_abort());
        assert_eq!(err.url(), Some("http://localhost/api/health"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_request_construction_errors_are_not_retryable() {
        assert!(!ClientError::InvalidHeader("bad header: invalid name".into()).is_retryable());
        assert!(!ClientError::InvalidUrl("relative URL without a base".into()).is_retryable());
        assert!(!ClientError::Protocol("too many redirects".into()).is_retryable());
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let err: ClientError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
        assert_eq!(err.status(), 0);
    }

    #[test]
    fn test_retryable_statuses() {
        let err = ClientError::Response { url: String::new(), status: 503, data: Value::Null };
        assert!(err.is_retryable());
        assert_eq!(err.message(), DEFAULT_ERROR_MESSAGE);
    }
}
