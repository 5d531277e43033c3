//! HTTP client with retry and backoff
//!
//! Provides a resilient HTTP client that handles:
//! - Endpoint validation before any request is built
//! - Basic authentication with the OpenProject API key
//! - Automatic retries with exponential backoff
//! - Content-Type checks and JSON parsing
//! - Extraction of the embedded record collection

use super::endpoint::resolve_endpoint;
use super::retry::{
    classify_status, RetryDecision, RetryPolicy, RetryState, StatusClass, TerminalKind,
};
use crate::auth::Authenticator;
use crate::config::TapConfig;
use crate::decode::Envelope;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Maximum idle connections kept per host
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL all endpoints are resolved against
    pub base_url: Url,
    /// Request timeout
    pub timeout: Duration,
    /// Retry limits and backoff timing
    pub retry: RetryPolicy,
    /// User agent string
    pub user_agent: String,
    /// Connection pool bound
    pub pool_size: usize,
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder(base_url: Url) -> HttpClientConfigBuilder {
        HttpClientConfigBuilder {
            config: Self {
                base_url,
                timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
                retry: RetryPolicy::default(),
                user_agent: crate::config::default_user_agent(),
                pool_size: DEFAULT_POOL_SIZE,
            },
        }
    }

    /// Derive client settings from a validated tap configuration
    pub fn from_tap_config(config: &TapConfig) -> Self {
        Self::builder(config.base_url().clone())
            .timeout(config.timeout())
            .max_retries(config.max_retries())
            .user_agent(config.user_agent())
            .build()
    }
}

/// Builder for HTTP client config
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    /// Set backoff bounds
    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.config.retry.initial_backoff = initial;
        self.config.retry.max_backoff = max;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the connection pool bound
    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Source of extracted records
///
/// The sync engine only depends on this contract, which keeps it testable
/// without a network.
#[async_trait]
pub trait RecordSource {
    /// Fetch every record exposed by `endpoint`
    async fn fetch_records(&self, endpoint: &str, query: &[(String, String)])
        -> Result<Vec<JsonValue>>;
}

/// HTTP client with retry and backoff
///
/// Owns one connection pool for its whole lifetime. The pool is released by
/// [`HttpClient::close`] or, on any other exit path, when the client drops.
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: HttpClientConfig, authenticator: Authenticator) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .pool_max_idle_per_host(config.pool_size)
            .build()?;

        Ok(Self {
            client,
            config,
            authenticator,
        })
    }

    /// Create a client from a validated tap configuration
    pub fn from_tap_config(config: &TapConfig) -> Result<Self> {
        let authenticator = Authenticator::new(config.api_key())?;
        Self::new(HttpClientConfig::from_tap_config(config), authenticator)
    }

    /// Fetch the records embedded in an endpoint's response
    pub async fn fetch(&self, endpoint: &str) -> Result<Vec<JsonValue>> {
        self.fetch_with_query(endpoint, &[]).await
    }

    /// Fetch embedded records with query parameters
    pub async fn fetch_with_query(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<Vec<JsonValue>> {
        let body = self.get_json(endpoint, query).await?;
        let envelope = Envelope::from_value(body);
        if envelope.is_empty() {
            debug!(endpoint, "Response carried no embedded elements");
        }

        info!(
            endpoint,
            records = envelope.elements.len(),
            total = ?envelope.total,
            "Retrieved records"
        );

        Ok(envelope.elements)
    }

    /// Make a GET request and parse the JSON body, retrying transient failures
    pub async fn get_json(&self, endpoint: &str, query: &[(String, String)]) -> Result<JsonValue> {
        let url = resolve_endpoint(&self.config.base_url, endpoint)?;
        let mut retry = RetryState::new(self.config.retry);

        loop {
            let error = match self.send_once(&url, query).await {
                Ok(body) => return Ok(body),
                Err(e) => e,
            };

            let reason = error.to_string();
            match retry.record_failure(error) {
                RetryDecision::Retry { attempt, delay } => {
                    warn!(
                        attempt,
                        max_retries = self.config.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Request failed ({reason}), retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::Fail(error) => {
                    match error.attempts() {
                        Some(attempts) => warn!(attempts, "Giving up after exhausting retries"),
                        None => debug!(retries = retry.retries(), "Request failed ({reason})"),
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Close the client and release its connection pool
    pub fn close(self) {
        debug!("Closing HTTP client");
        drop(self);
    }

    /// Send a single attempt
    async fn send_once(&self, url: &Url, query: &[(String, String)]) -> Result<JsonValue> {
        let mut req = self.client.get(url.clone());
        if !query.is_empty() {
            req = req.query(query);
        }
        req = self.authenticator.apply(req);

        debug!(url = %url, "GET request");
        let response = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status().as_u16();

        match classify_status(status) {
            StatusClass::Success => {}
            StatusClass::Retryable if status == 429 => {
                return Err(Error::RateLimited {
                    retry_after_seconds: extract_retry_after(&response),
                });
            }
            StatusClass::Retryable | StatusClass::Terminal(TerminalKind::Other) => {
                return Err(Error::HttpStatus { status });
            }
            StatusClass::Terminal(TerminalKind::Authentication) => {
                return Err(Error::Authentication { status });
            }
            StatusClass::Terminal(TerminalKind::NotFound) => {
                return Err(Error::NotFound {
                    url: url.to_string(),
                });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_json_content_type(&content_type) {
            warn!(content_type = %content_type, "Unexpected content type, parsing as JSON anyway");
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                Error::BodyRead(e)
            }
        })?;

        serde_json::from_slice(&body)
            .map_err(|e| Error::response_format(format!("invalid JSON body: {e}")))
    }

    fn transport_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else {
            Error::Http(error)
        }
    }
}

#[async_trait]
impl RecordSource for HttpClient {
    async fn fetch_records(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<Vec<JsonValue>> {
        self.fetch_with_query(endpoint, query).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .finish_non_exhaustive()
    }
}

/// Check whether a Content-Type names a JSON media type
pub(crate) fn is_json_content_type(value: &str) -> bool {
    let media_type = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}
