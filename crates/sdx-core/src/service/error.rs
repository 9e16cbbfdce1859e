use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Categories of service errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorKind {
    /// Connection refused, DNS failure, broken body, etc.
    Transport,
    /// Request exceeded the configured timeout
    Timeout,
    /// HTTP status error (4xx, 5xx)
    HttpStatus,
    /// Response body did not have the expected shape
    Parse,
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceErrorKind::Transport => write!(f, "transport"),
            ServiceErrorKind::Timeout => write!(f, "timeout"),
            ServiceErrorKind::HttpStatus => write!(f, "http_status"),
            ServiceErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured error from the symptom service with kind and details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    /// Error category
    pub kind: ServiceErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Message the server put under the `error` field of its body, if any
    pub server_error: Option<String>,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            server_error: None,
            details: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Transport, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Timeout, message)
    }

    /// Creates a parse error, keeping the offending body as details.
    pub fn parse(message: impl Into<String>, body: &str) -> Self {
        Self {
            details: (!body.is_empty()).then(|| body.to_string()),
            ..Self::new(ServiceErrorKind::Parse, message)
        }
    }

    /// Creates an HTTP status error.
    ///
    /// When the body is a JSON object with a string `error` field, that
    /// message is kept as `server_error` and used for display.
    pub fn http_status(status: u16, body: &str) -> Self {
        let server_error = extract_server_error(body);
        let message = match &server_error {
            Some(msg) => msg.clone(),
            None => format!("Request failed with status code {status}"),
        };
        Self {
            kind: ServiceErrorKind::HttpStatus,
            message,
            server_error,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Classifies a reqwest error into timeout or transport.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(format!("Request timed out: {err}"))
        } else {
            Self::transport(err.to_string())
        }
    }

    /// Returns the server-provided message, if any.
    pub fn server_message(&self) -> Option<&str> {
        self.server_error.as_deref()
    }

    pub fn is_parse(&self) -> bool {
        self.kind == ServiceErrorKind::Parse
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Result type for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Pulls a non-empty string `error` field out of a JSON error body.
fn extract_server_error(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_extracts_server_error() {
        let err = ServiceError::http_status(400, r#"{"error":"No symptoms provided"}"#);
        assert_eq!(err.kind, ServiceErrorKind::HttpStatus);
        assert_eq!(err.server_message(), Some("No symptoms provided"));
        assert_eq!(err.to_string(), "No symptoms provided");
        assert!(err.details.is_some());
    }

    #[test]
    fn test_http_status_without_json_body() {
        let err = ServiceError::http_status(502, "<html>bad gateway</html>");
        assert_eq!(err.server_message(), None);
        assert_eq!(err.to_string(), "Request failed with status code 502");
    }

    #[test]
    fn test_http_status_ignores_non_string_error_field() {
        let err = ServiceError::http_status(500, r#"{"error":{"code":1}}"#);
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_parse_keeps_body_as_details() {
        let err = ServiceError::parse("Expected a list of symptoms", r#"{"a":1}"#);
        assert!(err.is_parse());
        assert_eq!(err.details.as_deref(), Some(r#"{"a":1}"#));

        let err = ServiceError::parse("Empty", "");
        assert_eq!(err.details, None);
    }

    #[test]
    fn test_kind_display_is_snake_case() {
        assert_eq!(ServiceErrorKind::HttpStatus.to_string(), "http_status");
        assert_eq!(ServiceErrorKind::Timeout.to_string(), "timeout");
    }
}
