//! Tracing subscriber setup for the binary.

use std::io::IsTerminal;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `sigmalite=debug`.
pub const LOG_ENV_VAR: &str = "SIGMALITE_LOG";

/// Used when `SIGMALITE_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a stderr subscriber filtered by `SIGMALITE_LOG`.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = env_filter();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .try_init();
    });
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
