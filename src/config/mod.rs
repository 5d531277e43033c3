//! Configuration module
//!
//! Turns a raw JSON mapping (from a config file or the environment) into a
//! validated [`TapConfig`]. Validation happens before any network activity,
//! so an invalid configuration never reaches the HTTP client.
//!
//! # Keys
//!
//! | Key | Type | Required | Default |
//! |---|---|---|---|
//! | `api_key` | string | yes | |
//! | `base_url` | http/https URL | yes | |
//! | `timeout` | integer seconds | no | 30 |
//! | `max_retries` | integer | no | 3 |
//! | `start_date` | ISO-8601 string | no | |
//! | `user_agent` | string | no | `tap-openproject/<version>` |

mod settings;

pub use settings::{settings, Setting};

use crate::auth::ApiKey;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, OptionStringExt};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "OPENPROJECT_API_KEY";

/// Environment variable holding the base URL
pub const ENV_BASE_URL: &str = "OPENPROJECT_BASE_URL";

/// Environment variable holding the timeout
pub const ENV_TIMEOUT: &str = "OPENPROJECT_TIMEOUT";

/// Environment variable holding the retry count
pub const ENV_MAX_RETRIES: &str = "OPENPROJECT_MAX_RETRIES";

/// Environment variable holding the start date
pub const ENV_START_DATE: &str = "OPENPROJECT_START_DATE";

/// Value shipped in example config files
const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// Validated connector configuration
///
/// Only constructed through [`TapConfig::from_value`] and the loaders built
/// on it, so every field satisfies its constraint.
#[derive(Debug, Clone)]
pub struct TapConfig {
    base_url: Url,
    api_key: ApiKey,
    timeout_secs: u64,
    max_retries: u32,
    start_date: Option<String>,
    user_agent: String,
}

impl TapConfig {
    /// Validate a raw configuration mapping
    ///
    /// Checks run in order: `api_key`, `base_url`, `timeout`, `max_retries`,
    /// then the optional passthrough keys.
    pub fn from_value(raw: &JsonObject) -> Result<Self> {
        let api_key = raw
            .get("api_key")
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .none_if_blank()
            .filter(|key| key != API_KEY_PLACEHOLDER)
            .ok_or_else(|| Error::config("missing api_key"))?;

        let base_url = parse_base_url(raw.get("base_url"))?;

        let timeout_secs = match raw.get("timeout") {
            None | Some(JsonValue::Null) => DEFAULT_TIMEOUT_SECS,
            Some(value) => value
                .as_u64()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| Error::config("invalid timeout"))?,
        };

        let max_retries = match raw.get("max_retries") {
            None | Some(JsonValue::Null) => DEFAULT_MAX_RETRIES,
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| Error::config("invalid max_retries"))?,
        };

        let start_date = optional_string(raw, "start_date")?.none_if_blank();

        let user_agent = optional_string(raw, "user_agent")?
            .none_if_blank()
            .unwrap_or_else(default_user_agent);

        Ok(Self {
            base_url,
            api_key: ApiKey::new(api_key),
            timeout_secs,
            max_retries,
            start_date,
            user_agent,
        })
    }

    /// Load and validate a JSON config file
    ///
    /// On unix a warning is logged when the file is readable by anyone
    /// other than its owner.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        check_permissions(path);

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;
        let value: JsonValue = serde_json::from_str(&contents)
            .map_err(|e| Error::config(format!("Invalid JSON in {}: {e}", path.display())))?;

        debug!(path = %path.display(), "Loaded configuration file");
        Self::from_json(value)
    }

    /// Validate an already parsed JSON document
    pub fn from_json(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Self::from_value(&map),
            _ => Err(Error::config("configuration must be a JSON object")),
        }
    }

    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut raw = JsonObject::new();

        for (var, key) in [
            (ENV_API_KEY, "api_key"),
            (ENV_BASE_URL, "base_url"),
            (ENV_START_DATE, "start_date"),
        ] {
            if let Some(value) = lookup(var) {
                raw.insert(key.to_string(), JsonValue::String(value));
            }
        }

        // Numeric variables that fail to parse stay strings so validation rejects them
        for (var, key) in [(ENV_TIMEOUT, "timeout"), (ENV_MAX_RETRIES, "max_retries")] {
            if let Some(value) = lookup(var) {
                let parsed = value
                    .trim()
                    .parse::<u64>()
                    .map_or(JsonValue::String(value), JsonValue::from);
                raw.insert(key.to_string(), parsed);
            }
        }

        debug!("Using configuration from environment variables");
        Self::from_value(&raw)
    }

    /// Base URL of the OpenProject API (no trailing slash)
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// API key used for Basic authentication
    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Request timeout in whole seconds
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Maximum number of retries after the first attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Opaque start date filter, if configured
    pub fn start_date(&self) -> Option<&str> {
        self.start_date.as_deref()
    }

    /// User-Agent sent with every request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Default User-Agent header value
pub fn default_user_agent() -> String {
    format!("{}/{}", crate::NAME, crate::VERSION)
}

fn parse_base_url(value: Option<&JsonValue>) -> Result<Url> {
    let raw = value
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::config("missing base_url"))?;

    let url = Url::parse(raw.trim_end_matches('/'))
        .map_err(|_| Error::config("invalid base_url scheme"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config("invalid base_url scheme"));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::config("invalid base_url: missing host"));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::config("invalid base_url: query and fragment are not allowed"));
    }

    Ok(url)
}

fn optional_string(raw: &JsonObject, key: &str) -> Result<Option<String>> {
    match raw.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::config(format!("invalid {key}"))),
    }
}

/// Describe overly broad permission bits of a config file
pub fn permission_warning(mode: u32) -> Option<&'static str> {
    if mode & 0o004 != 0 {
        Some("config file is world-readable; run: chmod 600 <config>")
    } else if mode & 0o040 != 0 {
        Some("config file is group-readable; run: chmod 600 <config>")
    } else {
        None
    }
}

#[cfg(unix)]
fn check_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(path) {
        Ok(meta) => {
            if let Some(message) = permission_warning(meta.permissions().mode()) {
                warn!(path = %path.display(), "{message}");
            }
        }
        Err(e) => warn!("Could not check config file permissions: {e}"),
    }
}

#[cfg(not(unix))]
fn check_permissions(_path: &Path) {}
