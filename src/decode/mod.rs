//! Response decoder module
//!
//! OpenProject wraps collections in a HAL envelope:
//!
//! ```text
//! { "_embedded": { "elements": [ {...}, ... ] }, "total": N, "count": N }
//! ```
//!
//! A missing or malformed `_embedded.elements` decodes to zero records; only
//! a body that is not JSON at all is an error, and that is reported by the
//! HTTP client before the envelope is inspected.

use crate::types::JsonValue;

/// Key holding embedded resources
pub const EMBEDDED_KEY: &str = "_embedded";

/// Key holding the record collection inside `_embedded`
pub const ELEMENTS_KEY: &str = "elements";

/// Decoded collection envelope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    /// Records in response order
    pub elements: Vec<JsonValue>,
    /// Total number of matching records on the server
    pub total: Option<u64>,
    /// Number of records in this response
    pub count: Option<u64>,
}

impl Envelope {
    /// Decode an envelope from a parsed response body
    pub fn from_value(value: JsonValue) -> Self {
        let JsonValue::Object(mut map) = value else {
            return Self::default();
        };

        let total = map.get("total").and_then(JsonValue::as_u64);
        let count = map.get("count").and_then(JsonValue::as_u64);

        let elements = match map.remove(EMBEDDED_KEY) {
            Some(JsonValue::Object(mut embedded)) => match embedded.remove(ELEMENTS_KEY) {
                Some(JsonValue::Array(elements)) => elements,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        Self {
            elements,
            total,
            count,
        }
    }

    /// Whether the envelope holds no records
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
