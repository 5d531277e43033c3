//! The `projects` stream
//!
//! Describes where projects live in the API, how they are keyed and which
//! query parameters a sync sends.

use crate::config::TapConfig;
use crate::error::Result;
use crate::types::{JsonValue, QueryParams};
use serde_json::json;

const PROJECTS_SCHEMA: &str = include_str!("schemas/projects.json");

/// OpenProject projects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectsStream {
    start_date: Option<String>,
}

impl ProjectsStream {
    /// Stream name used in catalog and messages
    pub const NAME: &'static str = "projects";

    /// Endpoint relative to the API base URL
    pub const ENDPOINT: &'static str = "projects";

    /// Primary key fields
    pub const KEY_PROPERTIES: &'static [&'static str] = &["id"];

    /// Incremental cursor field
    pub const REPLICATION_KEY: &'static str = "updatedAt";

    /// Create the stream with an optional start date filter
    pub fn new(start_date: Option<&str>) -> Self {
        Self {
            start_date: start_date.map(str::to_string),
        }
    }

    /// Create the stream from the tap configuration
    pub fn from_config(config: &TapConfig) -> Self {
        Self::new(config.start_date())
    }

    /// JSON schema of a project record
    pub fn schema() -> Result<JsonValue> {
        Ok(serde_json::from_str(PROJECTS_SCHEMA)?)
    }

    /// Key properties as owned strings
    pub fn key_properties() -> Vec<String> {
        Self::KEY_PROPERTIES.iter().map(ToString::to_string).collect()
    }

    /// Query parameters for the extraction request
    ///
    /// A configured start date becomes an OpenProject `updatedAt >=` filter.
    /// The date is embedded through the JSON serializer and never parsed.
    pub fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();

        if let Some(start_date) = &self.start_date {
            let filters = json!([{
                "updatedAt": {
                    "operator": ">=",
                    "values": [start_date]
                }
            }]);
            params.push(("filters".to_string(), filters.to_string()));
        }

        params
    }
}
