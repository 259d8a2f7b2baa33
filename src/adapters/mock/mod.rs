//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - Scripted HTTP responses with request recording
//! - [`InMemoryCredentials`] - In-memory credential storage

pub mod credentials;
pub mod http;

pub use credentials::InMemoryCredentials;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
