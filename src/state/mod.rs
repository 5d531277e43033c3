//! State handling
//!
//! The tap treats incoming state as an opaque JSON object. It is read once
//! at the start of a sync and echoed back in the final `STATE` message with
//! a `last_sync` timestamp added.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;
use tracing::warn;

/// Key written into the emitted state on every successful sync
pub const LAST_SYNC_KEY: &str = "last_sync";

/// Opaque sync state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    value: JsonObject,
}

impl State {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Load state from a file
    ///
    /// A path that does not exist yields an empty state and a warning.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "State file not found, starting without state");
            return Ok(Self::new());
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
        Self::from_json(&contents)
    }

    /// Parse state from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::new());
        }

        let value: JsonValue = serde_json::from_str(json)
            .map_err(|e| Error::state(format!("Failed to parse state JSON: {e}")))?;
        match value {
            JsonValue::Object(value) => Ok(Self { value }),
            JsonValue::Null => Ok(Self::new()),
            _ => Err(Error::state("state must be a JSON object")),
        }
    }

    /// The raw state object
    pub fn value(&self) -> &JsonObject {
        &self.value
    }

    /// Timestamp of the previous successful sync, if recorded
    pub fn last_sync(&self) -> Option<&str> {
        self.value.get(LAST_SYNC_KEY).and_then(JsonValue::as_str)
    }

    /// The state to emit after a sync finished at `now`
    pub fn with_last_sync(&self, now: DateTime<Utc>) -> JsonValue {
        let mut value = self.value.clone();
        value.insert(
            LAST_SYNC_KEY.to_string(),
            JsonValue::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        JsonValue::Object(value)
    }
}
