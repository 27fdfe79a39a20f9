//! Normalized API errors
//!
//! Every failure a caller can see is one of two kinds: the session expired, or
//! something else went wrong and `message` says what. Backend error bodies come
//! in several shapes; [`EXTRACTORS`] lists, in priority order, the places a
//! human-readable message may be found.

use serde_json::Value;

/// Message carried by [`ApiError::SessionExpired`].
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please sign in again.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the credential; only signing in again helps.
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,

    #[error("{message}")]
    Api { message: String },
}

impl ApiError {
    pub fn api(message: impl Into<String>) -> Self {
        ApiError::Api {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::SessionExpired => SESSION_EXPIRED_MESSAGE,
            ApiError::Api { message } => message,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

/// Failure below HTTP: the request never produced a response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::api(err.to_string())
    }
}

/// Looks for a message in one place of an error body.
pub type Extractor = fn(&Value) -> Option<String>;

/// Tried in order; the first non-empty message wins.
pub const EXTRACTORS: &[Extractor] = &[
    detail_text,
    detail_list,
    message_field,
    username_errors,
    password_errors,
    non_field_errors,
];

/// Turn an error body into a message, falling back to the status text.
///
/// `body` is `None` when the response could not be parsed as JSON.
pub fn error_message(body: Option<&Value>, status: u16, status_text: &str) -> String {
    body.and_then(|body| EXTRACTORS.iter().find_map(|extract| extract(body)))
        .unwrap_or_else(|| fallback_message(status, status_text))
}

fn fallback_message(status: u16, status_text: &str) -> String {
    let text = status_text.trim();
    if text.is_empty() {
        format!("Request failed with status {}", status)
    } else {
        text.to_string()
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn first_string(value: &Value) -> Option<String> {
    value.as_array()?.first()?.as_str().and_then(non_empty)
}

fn detail_text(body: &Value) -> Option<String> {
    body.get("detail")?.as_str().and_then(non_empty)
}

fn detail_list(body: &Value) -> Option<String> {
    first_string(body.get("detail")?)
}

fn message_field(body: &Value) -> Option<String> {
    body.get("message")?.as_str().and_then(non_empty)
}

fn username_errors(body: &Value) -> Option<String> {
    first_string(body.get("username")?)
}

fn password_errors(body: &Value) -> Option<String> {
    first_string(body.get("password")?)
}

fn non_field_errors(body: &Value) -> Option<String> {
    first_string(body.get("non_field_errors")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(body: Value, status_text: &str) -> String {
        error_message(Some(&body), 400, status_text)
    }

    #[test]
    fn test_detail_string() {
        assert_eq!(message(json!({"detail": "bad"}), "Bad Request"), "bad");
    }

    #[test]
    fn test_detail_list_takes_first() {
        assert_eq!(message(json!({"detail": ["x", "y"]}), "Bad Request"), "x");
    }

    #[test]
    fn test_username_field() {
        assert_eq!(message(json!({"username": ["taken"]}), "Bad Request"), "taken");
    }

    #[test]
    fn test_empty_body_uses_status_text() {
        assert_eq!(
            error_message(Some(&json!({})), 404, "Not Found"),
            "Not Found"
        );
    }

    #[test]
    fn test_unparsed_body_uses_status_text() {
        assert_eq!(
            error_message(None, 502, "Bad Gateway"),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_missing_status_text_mentions_status() {
        assert_eq!(
            error_message(None, 503, ""),
            "Request failed with status 503"
        );
    }

    #[test]
    fn test_priority_order() {
        let body = json!({
            "message": "from message",
            "detail": "from detail",
            "username": ["from username"],
        });
        assert_eq!(message(body, "x"), "from detail");

        let body = json!({
            "message": "from message",
            "password": ["from password"],
        });
        assert_eq!(message(body, "x"), "from message");

        let body = json!({
            "non_field_errors": ["from non field"],
            "password": ["from password"],
        });
        assert_eq!(message(body, "x"), "from password");

        let body = json!({"non_field_errors": ["Unable to log in."]});
        assert_eq!(message(body, "x"), "Unable to log in.");
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let body = json!({
            "detail": "",
            "message": "",
            "username": [],
            "password": [""],
        });
        assert_eq!(message(body, "Bad Request"), "Bad Request");

        let body = json!({"detail": [], "message": "fallback"});
        assert_eq!(message(body, "Bad Request"), "fallback");
    }

    #[test]
    fn test_non_object_body_uses_status_text() {
        assert_eq!(message(json!(["a", "b"]), "Conflict"), "Conflict");
        assert_eq!(message(json!("plain"), "Conflict"), "Conflict");
    }

    #[test]
    fn test_session_expired_message() {
        let err = ApiError::SessionExpired;
        assert_eq!(err.to_string(), SESSION_EXPIRED_MESSAGE);
        assert_eq!(err.message(), SESSION_EXPIRED_MESSAGE);
        assert!(err.is_session_expired());
    }

    #[test]
    fn test_transport_error_becomes_api_error() {
        let err: ApiError = TransportError::Network("connection refused".into()).into();
        assert_eq!(err.message(), "Network error: connection refused");
        assert!(!err.is_session_expired());
    }
}
