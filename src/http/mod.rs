//! HTTP client module
//!
//! Provides the resilient HTTP client used to talk to OpenProject.
//!
//! # Features
//!
//! - **Endpoint Validation**: Rejects empty and path-traversal endpoints before any I/O
//! - **Status Classification**: Pure mapping from status code to retry decision
//! - **Automatic Retries**: Exponential backoff on timeouts, connection failures, 429 and 5xx
//! - **Authentication**: Basic `apikey` credential from the auth module
//! - **Envelope Extraction**: Returns the records under `_embedded.elements`

mod client;
mod endpoint;
mod retry;

pub use client::{HttpClient, HttpClientConfig, RecordSource, DEFAULT_POOL_SIZE};
pub use endpoint::{resolve_endpoint, validate_endpoint};
pub use retry::{
    classify_status, RetryDecision, RetryPolicy, RetryState, StatusClass, TerminalKind,
    RETRYABLE_STATUSES,
};
