//! Authenticator implementation
//!
//! Builds the Basic credential once and applies it to each request.

use super::types::ApiKey;
use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;

/// Username OpenProject expects for API key authentication
pub const API_KEY_USERNAME: &str = "apikey";

/// Authenticator handles applying authentication to HTTP requests
#[derive(Clone)]
pub struct Authenticator {
    header: HeaderValue,
}

impl Authenticator {
    /// Create an authenticator for the given API key
    pub fn new(api_key: &ApiKey) -> Result<Self> {
        let encoded = STANDARD.encode(format!("{API_KEY_USERNAME}:{}", api_key.expose()));
        let mut header = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|_| Error::config("api_key contains characters not allowed in a header"))?;
        header.set_sensitive(true);
        Ok(Self { header })
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(AUTHORIZATION, self.header.clone())
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("scheme", &"basic")
            .field("username", &API_KEY_USERNAME)
            .finish_non_exhaustive()
    }
}
