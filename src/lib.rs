//! TeddyNote Parser client library
//!
//! A Rust client for the TeddyNote Parser document-parsing service.
//! Submits PDFs for asynchronous parsing, waits for the resulting job under
//! a bounded polling budget, and downloads and unpacks the result archive.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, ClientError, Result};
