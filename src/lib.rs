//! SigmaLite - session-aware client for the SigmaLite data exploration API
//!
//! This library exposes modules for use by the CLI and integration tests.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
