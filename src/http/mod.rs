//! HTTP client module
//!
//! Provides the JSON transport the operation engine fetches pages with.
//!
//! # Features
//!
//! - **Per-segment path encoding**: path parameters may contain `/` or spaces
//! - **Error classification**: transport failures vs. service errors
//! - **AWS-style error codes**: `x-amzn-ErrorType` and `__type` parsing

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
