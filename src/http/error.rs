//! Error taxonomy of the HTTP access layer.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback text when a 5xx response carries no usable message.
pub const DEFAULT_SERVER_ERROR: &str = "An unexpected server error has occurred.";

/// Error body returned by the API: `{ "error": { "message", "status_code" } }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerErrorResponse {
    #[serde(default)]
    pub error: Option<ServerErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

impl ServerErrorResponse {
    /// Parse a raw body, tolerating anything that is not the expected shape.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// The non-empty `error.message`, if present.
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.message.as_deref())
            .filter(|m| !m.is_empty())
    }
}

/// Errors surfaced by [`ApiClient`](crate::http::ApiClient).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a 5xx status.
    #[error("server error ({status}): {}", .error.as_ref().and_then(|e| e.message()).unwrap_or(DEFAULT_SERVER_ERROR))]
    Server {
        status: StatusCode,
        error: Option<ServerErrorResponse>,
        body: String,
    },

    /// The server answered with a 4xx status.
    #[error("client error ({status}){}", .error.as_ref().and_then(|e| e.message()).map(|m| format!(": {m}")).unwrap_or_default())]
    Client {
        status: StatusCode,
        error: Option<ServerErrorResponse>,
        body: String,
    },

    /// A non-success status outside the 4xx and 5xx classes.
    #[error("unexpected response status {status}")]
    Unexpected { status: StatusCode, body: String },

    /// The request was sent but no response arrived.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request could not be built, so it was never sent.
    #[error("request setup failed: {0}")]
    Setup(String),

    /// The caller supplied options the operation cannot work with.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A successful response body did not match the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Classify a non-success response.
    pub fn from_response(status: StatusCode, body: String) -> Self {
        let error = ServerErrorResponse::parse(&body);
        if status.is_server_error() {
            ApiError::Server { status, error, body }
        } else if status.is_client_error() {
            ApiError::Client { status, error, body }
        } else {
            ApiError::Unexpected { status, body }
        }
    }

    /// HTTP status for errors that carry a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. }
            | ApiError::Client { status, .. }
            | ApiError::Unexpected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-supplied error message, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { error, .. } | ApiError::Client { error, .. } => {
                error.as_ref().and_then(|e| e.message())
            }
            _ => None,
        }
    }

    /// A 403 whose message mentions "unauthenticated": the session expired.
    pub fn is_session_timeout(&self) -> bool {
        match self {
            ApiError::Client { status, .. } if *status == StatusCode::FORBIDDEN => self
                .server_message()
                .map(|m| m.to_lowercase().contains("unauthenticated"))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Server { .. } => "server",
            ApiError::Client { .. } => "client",
            ApiError::Unexpected { .. } => "unexpected",
            ApiError::Network(_) => "network",
            ApiError::Setup(_) => "setup",
            ApiError::Configuration(_) => "configuration",
            ApiError::Decode(_) => "decode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, String::new());
        assert!(matches!(err, ApiError::Server { .. }));
        assert_eq!(err.to_string(), format!("server error (502 Bad Gateway): {DEFAULT_SERVER_ERROR}"));

        let err = ApiError::from_response(StatusCode::NOT_FOUND, "not json".into());
        assert!(matches!(err, ApiError::Client { error: None, .. }));
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

        let err = ApiError::from_response(StatusCode::NOT_MODIFIED, String::new());
        assert_eq!(err.kind(), "unexpected");
    }

    #[test]
    fn test_session_timeout_signature() {
        let body = r#"{"error":{"message":"Unauthenticated.","status_code":403}}"#;
        let err = ApiError::from_response(StatusCode::FORBIDDEN, body.into());
        assert!(err.is_session_timeout());
        assert_eq!(err.to_string(), "client error (403 Forbidden): Unauthenticated.");

        let err = ApiError::from_response(StatusCode::UNAUTHORIZED, body.into());
        assert!(!err.is_session_timeout());

        let body = r#"{"error":{"message":"This action is unauthorized."}}"#;
        let err = ApiError::from_response(StatusCode::FORBIDDEN, body.into());
        assert!(!err.is_session_timeout());
    }

    #[test]
    fn test_empty_message_falls_back() {
        let body = r#"{"error":{"message":""}}"#;
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, body.into());
        assert_eq!(err.server_message(), None);
        assert!(err.to_string().ends_with(DEFAULT_SERVER_ERROR));
    }
}
