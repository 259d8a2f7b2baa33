//! CLI module for sigmalite.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Command execution against the API
//!
//! # Usage
//!
//! ```ignore
//! use sigmalite::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! let output = runtime.block_on(run_cli_command(command))?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, DatasetCommand, USAGE};
pub use commands::execute;
pub use version::{version_string, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::debug;

use crate::api::ApiClient;
use crate::config::ClientConfig;

/// Run a parsed command and return the text to print.
///
/// `Version` and `Help` return without building a client. API failures are
/// reported with their user-facing message and recovery hint.
pub async fn run_cli_command(command: CliCommand) -> Result<String> {
    match command {
        CliCommand::Version => return Ok(version_string()),
        CliCommand::Help => return Ok(USAGE.to_string()),
        CliCommand::Invalid(message) => return Err(eyre!("{}\n\n{}", message, USAGE)),
        _ => {}
    }

    let config = ClientConfig::from_env();
    debug!(base_url = %config.base_url, "Using API");
    let client = ApiClient::from_config(&config)
        .await
        .map_err(|e| eyre!(e.user_message()))?;

    match execute(&client, command).await {
        Ok(value) => Ok(serde_json::to_string_pretty(&value)?),
        Err(e) => {
            debug!(code = e.error_code(), "Command failed: {}", e);
            Err(eyre!(
                "{}\n{}",
                e.user_message(),
                e.category().recovery_hint()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_version_needs_no_client() {
        let output = run_cli_command(CliCommand::Version).await.unwrap();
        assert_eq!(output, version_string());
    }

    #[tokio::test]
    async fn test_invalid_includes_usage() {
        let err = run_cli_command(CliCommand::Invalid("Unknown command: x".to_string()))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Unknown command: x"));
        assert!(message.contains("Usage: sigmalite"));
    }
}
