//! Errors returned by the API client and its facades.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::traits::{HttpError, Response};

/// Longest raw body kept as an error detail.
const MAX_DETAIL_LEN: usize = 200;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] HttpError),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}{}", .detail.as_ref().map(|d| format!(": {}", d)).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },

    /// Token refresh failed; the local session has been cleared.
    #[error("Session expired: {reason}")]
    SessionExpired { reason: String },

    /// The response body did not match the expected shape.
    #[error("Unexpected response body: {message}")]
    Decode { message: String },

    /// The caller supplied something unusable before any request was sent.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode {
            message: e.to_string(),
        }
    }
}

impl ApiError {
    /// Build a status error from a non-2xx response.
    ///
    /// Picks up FastAPI's `detail` field, either a string or the first
    /// validation error's `msg`, and falls back to a short plain-text body.
    pub fn from_response(response: &Response) -> Self {
        ApiError::Status {
            status: response.status,
            detail: extract_detail(response),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-supplied detail, when there was one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The user has to sign in again before this can succeed.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ApiError::SessionExpired { .. }) || self.is_unauthorized()
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Transport(_) => ErrorCategory::Network,
            ApiError::SessionExpired { .. } => ErrorCategory::Auth,
            ApiError::Status { status: 401, .. } => ErrorCategory::Auth,
            ApiError::Status { status, .. } if *status >= 500 => ErrorCategory::Server,
            ApiError::Status { .. } => ErrorCategory::User,
            ApiError::Decode { .. } => ErrorCategory::Client,
            ApiError::InvalidInput { .. } => ErrorCategory::User,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Message suitable for showing to a person.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(HttpError::Timeout(_)) => {
                "The server took too long to respond. Please try again.".to_string()
            }
            ApiError::Transport(_) => {
                "Could not reach the SigmaLite server. Check your connection and try again."
                    .to_string()
            }
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Status { status, detail: None } => match *status {
                401 => "You are not signed in. Please sign in to continue.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                404 => "The requested item was not found.".to_string(),
                s if s >= 500 => "The server encountered an error. Please try again later.".to_string(),
                s => format!("Request failed (HTTP {}).", s),
            },
            ApiError::SessionExpired { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::Decode { .. } => {
                "Received an unexpected response from the server.".to_string()
            }
            ApiError::InvalidInput { message } => message.clone(),
        }
    }

    /// Short code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Transport(HttpError::Timeout(_)) => "E_NET_TIMEOUT",
            ApiError::Transport(_) => "E_NET",
            ApiError::Status { status: 401, .. } => "E_AUTH_UNAUTHORIZED",
            ApiError::Status { status: 403, .. } => "E_AUTH_FORBIDDEN",
            ApiError::Status { status: 404, .. } => "E_NOT_FOUND",
            ApiError::Status { status, .. } if *status >= 500 => "E_SERVER",
            ApiError::Status { .. } => "E_REQUEST",
            ApiError::SessionExpired { .. } => "E_AUTH_SESSION_EXPIRED",
            ApiError::Decode { .. } => "E_DECODE",
            ApiError::InvalidInput { .. } => "E_INPUT",
        }
    }
}

fn extract_detail(response: &Response) -> Option<String> {
    let text = response.text().ok()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
        return match json.get("detail") {
            Some(serde_json::Value::String(detail)) => Some(detail.clone()),
            Some(serde_json::Value::Array(errors)) => errors
                .first()
                .and_then(|e| e.get("msg"))
                .and_then(|m| m.as_str())
                .map(str::to_string),
            Some(other) if !other.is_null() => Some(other.to_string()),
            _ => None,
        };
    }

    if text.starts_with('<') {
        return None;
    }
    Some(text.chars().take(MAX_DETAIL_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn response(status: u16, body: &str) -> Response {
        Response::new(status, Bytes::from(body.to_string()))
    }

    #[test]
    fn test_detail_from_fastapi_string() {
        let err = ApiError::from_response(&response(400, r#"{"detail":"Email already registered"}"#));
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.detail(), Some("Email already registered"));
        assert_eq!(err.user_message(), "Email already registered");
        assert_eq!(err.to_string(), "HTTP 400: Email already registered");
    }

    #[test]
    fn test_detail_from_validation_errors() {
        let body = r#"{"detail":[{"loc":["body","password"],"msg":"String should have at least 8 characters","type":"string_too_short"}]}"#;
        let err = ApiError::from_response(&response(422, body));
        assert_eq!(err.detail(), Some("String should have at least 8 characters"));
        assert_eq!(err.category(), ErrorCategory::User);
    }

    #[test]
    fn test_plain_text_detail_is_truncated() {
        let long = "x".repeat(500);
        let err = ApiError::from_response(&response(500, &long));
        assert_eq!(err.detail().unwrap().len(), MAX_DETAIL_LEN);
        assert_eq!(err.category(), ErrorCategory::Server);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_html_and_empty_bodies_fall_back() {
        let err = ApiError::from_response(&response(502, "<html>Bad Gateway</html>"));
        assert!(err.detail().is_none());
        assert!(err.user_message().contains("server encountered an error"));

        let err = ApiError::from_response(&response(404, ""));
        assert!(err.detail().is_none());
        assert_eq!(err.user_message(), "The requested item was not found.");
        assert_eq!(err.to_string(), "HTTP 404");
    }

    #[test]
    fn test_unauthorized_requires_reauth() {
        let err = ApiError::from_response(&response(401, r#"{"detail":"Could not validate credentials"}"#));
        assert!(err.is_unauthorized());
        assert!(err.requires_reauth());
        assert_eq!(err.category(), ErrorCategory::Auth);
        assert_eq!(err.error_code(), "E_AUTH_UNAUTHORIZED");

        let forbidden = ApiError::from_response(&response(403, ""));
        assert!(!forbidden.requires_reauth());
    }

    #[test]
    fn test_session_expired() {
        let err = ApiError::SessionExpired {
            reason: "refresh rejected".to_string(),
        };
        assert!(err.requires_reauth());
        assert!(!err.is_unauthorized());
        assert!(err.user_message().contains("sign in again"));
    }

    #[test]
    fn test_transport_errors() {
        let err: ApiError = HttpError::Timeout("30s".to_string()).into();
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.error_code(), "E_NET_TIMEOUT");
        assert!(err.user_message().contains("too long"));

        let err: ApiError = HttpError::ConnectionFailed("refused".to_string()).into();
        assert!(err.is_retryable());
        assert!(err.status().is_none());
    }

    #[test]
    fn test_json_error_is_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ApiError = json_err.into();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert_eq!(err.category(), ErrorCategory::Client);
    }
}
