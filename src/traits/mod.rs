//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport used by the API client
//! - [`CredentialsProvider`] - Durable token storage used by the token store

pub mod credentials;
pub mod http;

pub use credentials::{CredentialsError, CredentialsProvider};
pub use http::{FormPart, Headers, HttpClient, HttpError, HttpRequest, Method, RequestBody, Response};
