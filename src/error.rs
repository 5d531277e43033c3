//! Error types for tap-openproject
//!
//! This module defines the error hierarchy for the entire tap.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! No variant ever carries the API key, so `Display` and `Debug` output is
//! safe to write to the diagnostic channel.

use thiserror::Error;

/// The main error type for tap-openproject
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Request Validation Errors
    // ============================================================================
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Terminal HTTP Errors
    // ============================================================================
    #[error("Authentication failed (HTTP {status}): check api_key")]
    Authentication { status: u16 },

    #[error("Endpoint not found (HTTP 404): {url}")]
    NotFound { url: String },

    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    // ============================================================================
    // Transient HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Connection lost while reading response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    #[error("Rate limited (HTTP 429)")]
    RateLimited { retry_after_seconds: Option<u64> },

    #[error("Request timeout after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Unexpected response format: {message}")]
    ResponseFormat { message: String },

    // ============================================================================
    // Catalog / State Errors
    // ============================================================================
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("State error: {message}")]
    State { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a response format error
    pub fn response_format(message: impl Into<String>) -> Self {
        Self::ResponseFormat {
            message: message.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Check if this error is transient and worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimited { .. } | Error::Timeout { .. } | Error::BodyRead(_) => true,
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Error::HttpStatus { status } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Number of attempts made before giving up, if retries were exhausted
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Error::RetriesExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// The innermost error, looking through `RetriesExhausted`
    pub fn last_error(&self) -> &Error {
        match self {
            Error::RetriesExhausted { source, .. } => source.last_error(),
            other => other,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    crate::http::RETRYABLE_STATUSES.contains(&status)
}

/// Result type alias for tap-openproject
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("missing api_key");
        assert_eq!(err.to_string(), "Configuration error: missing api_key");

        let err = Error::Authentication { status: 401 };
        assert_eq!(
            err.to_string(),
            "Authentication failed (HTTP 401): check api_key"
        );

        let err = Error::HttpStatus { status: 418 };
        assert_eq!(err.to_string(), "HTTP 418");
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::RateLimited {
            retry_after_seconds: None
        }
        .is_retryable());
        assert!(Error::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(Error::HttpStatus { status: 500 }.is_retryable());
        assert!(Error::HttpStatus { status: 503 }.is_retryable());
        assert!(Error::HttpStatus { status: 504 }.is_retryable());

        assert!(!Error::HttpStatus { status: 400 }.is_retryable());
        assert!(!Error::HttpStatus { status: 501 }.is_retryable());
        assert!(!Error::Authentication { status: 401 }.is_retryable());
        assert!(!Error::NotFound { url: "x".into() }.is_retryable());
        assert!(!Error::config("test").is_retryable());
        assert!(!Error::validation("test").is_retryable());
        assert!(!Error::response_format("test").is_retryable());
    }

    #[test]
    fn test_retries_exhausted_reports_attempts() {
        let err = Error::RetriesExhausted {
            attempts: 4,
            source: Box::new(Error::HttpStatus { status: 503 }),
        };
        assert_eq!(err.attempts(), Some(4));
        assert!(matches!(
            err.last_error(),
            Error::HttpStatus { status: 503 }
        ));
        assert_eq!(err.to_string(), "Request failed after 4 attempts: HTTP 503");
        assert!(!err.is_retryable());
    }
}
