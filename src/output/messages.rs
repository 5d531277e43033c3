//! Singer message types

use crate::types::JsonValue;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// One line of tap output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    Schema {
        stream: String,
        schema: JsonValue,
        key_properties: Vec<String>,
        bookmark_properties: Vec<String>,
    },
    Record {
        stream: String,
        record: JsonValue,
        time_extracted: String,
    },
    State {
        value: JsonValue,
    },
}

impl Message {
    /// Build a `SCHEMA` message
    pub fn schema(
        stream: impl Into<String>,
        schema: JsonValue,
        key_properties: Vec<String>,
        bookmark_properties: Vec<String>,
    ) -> Self {
        Self::Schema {
            stream: stream.into(),
            schema,
            key_properties,
            bookmark_properties,
        }
    }

    /// Build a `RECORD` message stamped with the extraction time
    pub fn record(stream: impl Into<String>, record: JsonValue, extracted: DateTime<Utc>) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted: extracted.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Build a `STATE` message
    pub fn state(value: JsonValue) -> Self {
        Self::State { value }
    }
}
