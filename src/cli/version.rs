//! Version command for the sigmalite CLI.

/// The current version of sigmalite, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Text printed by `--version`.
pub fn version_string() -> String {
    format!("sigmalite {}", VERSION)
}
