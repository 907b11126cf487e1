//! HTTP client module
//!
//! Thin wrapper around `reqwest` used by the status poller and the
//! spreadsheet sink.
//!
//! # Features
//!
//! - **Base URL**: relative paths resolve against the configured API root
//! - **Hard timeout**: every request is bounded (10 s by default)
//! - **Authentication**: integration with the auth module

mod client;

pub use client::{HttpClient, HttpClientConfig, RequestConfig, DEFAULT_TIMEOUT};
