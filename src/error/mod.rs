//! Error handling for the SigmaLite client.
//!
//! | Category | Raised by | Retryable |
//! |----------|-----------|-----------|
//! | Network | transport failures | Yes |
//! | Auth | 401 without a usable refresh, expired session | No |
//! | Server | HTTP 5xx | Yes |
//! | Client | undecodable response bodies | No |
//! | User | other HTTP 4xx, bad local input | No |
//!
//! The client never retries on its own except for the single token
//! refresh after a 401.

mod api;
mod category;

pub use api::ApiError;
pub use category::ErrorCategory;

/// Result alias for client operations.
pub type ApiResult<T> = Result<T, ApiError>;
