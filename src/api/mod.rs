//! SigmaLite REST API.
//!
//! [`ApiClient`] owns the transport and the session; the per-resource
//! facades borrow it and add typed request/response handling only.

pub mod auth;
pub mod charts;
pub mod client;
pub mod datasets;
pub mod sheets;

pub use auth::AuthApi;
pub use charts::ChartApi;
pub use client::ApiClient;
pub use datasets::{DatasetApi, UploadFile};
pub use sheets::SheetApi;
