//! Session state for the SigmaLite client.
//!
//! This module provides:
//! - Credentials file storage
//! - The token store that owns the current session
//! - Untrusted identity decoded from access tokens

pub mod credentials;
pub mod identity;
pub mod token_store;

pub use credentials::{default_credentials_path, Credentials, CredentialsManager};
pub use identity::{decode_untrusted_claims, UntrustedClaims, UserIdentity};
pub use token_store::{SessionEvent, SessionState, TokenStore};
