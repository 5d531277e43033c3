//! Settings description published by `--about`

use super::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::types::JsonValue;
use serde::Serialize;
use serde_json::json;

/// One configuration key as advertised to orchestrators
#[derive(Debug, Clone, Serialize)]
pub struct Setting {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub required: bool,
    pub secret: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<JsonValue>,
    pub description: &'static str,
}

/// All supported configuration keys
pub fn settings() -> Vec<Setting> {
    vec![
        Setting {
            name: "api_key",
            kind: "string",
            required: true,
            secret: true,
            default: None,
            description: "OpenProject API key from My Account > Access tokens",
        },
        Setting {
            name: "base_url",
            kind: "string",
            required: true,
            secret: false,
            default: None,
            description: "Base URL of the OpenProject API, e.g. https://instance.openproject.com/api/v3",
        },
        Setting {
            name: "timeout",
            kind: "integer",
            required: false,
            secret: false,
            default: Some(json!(DEFAULT_TIMEOUT_SECS)),
            description: "HTTP request timeout in seconds",
        },
        Setting {
            name: "max_retries",
            kind: "integer",
            required: false,
            secret: false,
            default: Some(json!(DEFAULT_MAX_RETRIES)),
            description: "Maximum number of retry attempts for transient failures",
        },
        Setting {
            name: "start_date",
            kind: "date-time",
            required: false,
            secret: false,
            default: None,
            description: "Only extract projects updated at or after this ISO 8601 timestamp",
        },
        Setting {
            name: "user_agent",
            kind: "string",
            required: false,
            secret: false,
            default: Some(json!(super::default_user_agent())),
            description: "User-Agent header for API requests",
        },
    ]
}
