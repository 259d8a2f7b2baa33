//! Error category classification.
//!
//! Groups API failures so callers can pick a recovery path without matching
//! on every variant.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout. Transient.
    Network,

    /// Missing or rejected credentials. Needs sign-in.
    Auth,

    /// Backend failure (HTTP 5xx). Transient.
    Server,

    /// Response did not match what the client expected.
    Client,

    /// Rejected input (HTTP 4xx other than 401, bad local arguments).
    User,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried by the user.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
        }
    }

    /// Suggested next step for the user.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your connection and the API URL, then try again",
            ErrorCategory::Auth => "Sign in again with `sigmalite login`",
            ErrorCategory::Server => {
                "The server may be experiencing issues. Please try again later"
            }
            ErrorCategory::Client => {
                "The client and server may be out of date with each other"
            }
            ErrorCategory::User => "Please check your input and try again",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
