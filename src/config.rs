//! Client configuration.
//!
//! Defaults, overridable from the environment or with the builder methods.
//!
//! # Example
//!
//! ```ignore
//! use sigmalite::config::ClientConfig;
//!
//! let config = ClientConfig::from_env()
//!     .with_timeout(std::time::Duration::from_secs(10));
//! ```

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::auth::default_credentials_path;

/// Backend used when `SIGMALITE_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Per-request timeout used when `SIGMALITE_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_URL: &str = "SIGMALITE_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "SIGMALITE_TIMEOUT_SECS";
pub const ENV_CREDENTIALS: &str = "SIGMALITE_CREDENTIALS";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    pub base_url: String,
    pub timeout: Duration,
    /// Where tokens are persisted. `None` when no home directory is known.
    pub credentials_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            credentials_path: default_credentials_path(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL. Trailing slashes are dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Defaults overridden by `SIGMALITE_API_URL`, `SIGMALITE_TIMEOUT_SECS`
    /// and `SIGMALITE_CREDENTIALS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = non_empty_var(ENV_API_URL) {
            config = config.with_base_url(url);
        }

        if let Some(raw) = non_empty_var(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config = config.with_timeout(Duration::from_secs(secs)),
                _ => warn!(
                    "Ignoring invalid {}={:?}, using {}s",
                    ENV_TIMEOUT_SECS,
                    raw,
                    DEFAULT_TIMEOUT.as_secs()
                ),
            }
        }

        if let Some(path) = non_empty_var(ENV_CREDENTIALS) {
            config = config.with_credentials_path(path);
        }

        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
