//! Catalog discovery and stream selection
//!
//! The catalog lists the streams this tap can extract. When a catalog is
//! supplied for a sync, its root-level `selected` metadata decides which
//! streams run; without one every stream runs.

use crate::error::{Error, Result};
use crate::stream::ProjectsStream;
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use tracing::warn;

/// Streams this tap knows how to extract
pub const KNOWN_STREAMS: &[&str] = &[ProjectsStream::NAME];

/// A Singer catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub streams: Vec<CatalogEntry>,
}

/// One stream in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub tap_stream_id: String,
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub schema: JsonValue,
    #[serde(default)]
    pub key_properties: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

/// Metadata attached to a stream or one of its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    #[serde(default)]
    pub breadcrumb: Vec<String>,
    #[serde(default)]
    pub metadata: JsonObject,
}

impl CatalogEntry {
    /// Name of the stream this entry describes
    pub fn name(&self) -> &str {
        self.stream.as_deref().unwrap_or(&self.tap_stream_id)
    }

    /// Root-level metadata, if present
    pub fn root_metadata(&self) -> Option<&JsonObject> {
        self.metadata
            .iter()
            .find(|m| m.breadcrumb.is_empty())
            .map(|m| &m.metadata)
    }

    /// Whether the root metadata marks this stream as selected
    pub fn is_selected(&self) -> bool {
        self.root_metadata()
            .and_then(|m| m.get("selected"))
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    }
}

impl Catalog {
    /// Build the catalog of every stream this tap offers
    pub fn discover() -> Result<Self> {
        let mut metadata = JsonObject::new();
        metadata.insert("selected".to_string(), json!(true));
        metadata.insert("inclusion".to_string(), json!("available"));
        metadata.insert(
            "table-key-properties".to_string(),
            json!(ProjectsStream::KEY_PROPERTIES),
        );
        metadata.insert(
            "valid-replication-keys".to_string(),
            json!([ProjectsStream::REPLICATION_KEY]),
        );

        Ok(Self {
            streams: vec![CatalogEntry {
                tap_stream_id: ProjectsStream::NAME.to_string(),
                stream: Some(ProjectsStream::NAME.to_string()),
                schema: ProjectsStream::schema()?,
                key_properties: ProjectsStream::key_properties(),
                replication_key: Some(ProjectsStream::REPLICATION_KEY.to_string()),
                metadata: vec![MetadataEntry {
                    breadcrumb: Vec::new(),
                    metadata,
                }],
            }],
        })
    }

    /// Load a catalog file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::catalog(format!("Failed to read catalog file: {e}")))?;
        Self::from_json(&contents)
    }

    /// Parse a catalog from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::catalog(format!("Invalid catalog JSON: {e}")))
    }

    /// Names of the selected streams, in catalog order
    pub fn selected_streams(&self) -> Vec<&str> {
        self.streams
            .iter()
            .filter(|entry| entry.is_selected())
            .map(CatalogEntry::name)
            .collect()
    }
}

/// Decide which known streams to sync
///
/// An explicit catalog always wins. Selected entries that name streams this
/// tap does not offer are reported and skipped.
pub fn resolve_selection(catalog: Option<&Catalog>) -> Vec<&'static str> {
    let Some(catalog) = catalog else {
        return KNOWN_STREAMS.to_vec();
    };

    let selected = catalog.selected_streams();
    for name in &selected {
        if !KNOWN_STREAMS.iter().any(|known| known == name) {
            warn!(stream = %name, "Catalog selects an unknown stream, ignoring it");
        }
    }

    KNOWN_STREAMS
        .iter()
        .copied()
        .filter(|known| selected.contains(known))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(name: &str, selected: Option<bool>) -> CatalogEntry {
        let mut metadata = JsonObject::new();
        if let Some(selected) = selected {
            metadata.insert("selected".to_string(), json!(selected));
        }
        CatalogEntry {
            tap_stream_id: name.to_string(),
            stream: Some(name.to_string()),
            schema: json!({}),
            key_properties: vec!["id".to_string()],
            replication_key: None,
            metadata: vec![MetadataEntry {
                breadcrumb: Vec::new(),
                metadata,
            }],
        }
    }

    #[test]
    fn test_discover_catalog() {
        let catalog = Catalog::discover().unwrap();
        assert_eq!(catalog.streams.len(), 1);

        let projects = &catalog.streams[0];
        assert_eq!(projects.tap_stream_id, "projects");
        assert_eq!(projects.key_properties, vec!["id".to_string()]);
        assert_eq!(projects.replication_key.as_deref(), Some("updatedAt"));
        assert!(projects.is_selected());
        assert_eq!(
            projects.root_metadata().unwrap()["inclusion"],
            json!("available")
        );
    }

    #[test]
    fn test_discover_catalog_round_trips_through_json() {
        let catalog = Catalog::discover().unwrap();
        let text = serde_json::to_string(&catalog).unwrap();
        assert_eq!(Catalog::from_json(&text).unwrap(), catalog);
    }

    #[test]
    fn test_selected_streams() {
        let catalog = Catalog {
            streams: vec![
                entry("projects", Some(true)),
                entry("users", Some(false)),
                entry("statuses", None),
            ],
        };
        assert_eq!(catalog.selected_streams(), vec!["projects"]);
    }

    #[test]
    fn test_field_metadata_does_not_select_stream() {
        let mut projects = entry("projects", None);
        let mut field = JsonObject::new();
        field.insert("selected".to_string(), json!(true));
        projects.metadata.push(MetadataEntry {
            breadcrumb: vec!["properties".to_string(), "name".to_string()],
            metadata: field,
        });

        assert!(!projects.is_selected());
    }

    #[test]
    fn test_resolve_selection_without_catalog() {
        assert_eq!(resolve_selection(None), vec!["projects"]);
    }

    #[test]
    fn test_resolve_selection_catalog_wins() {
        let deselected = Catalog {
            streams: vec![entry("projects", Some(false))],
        };
        assert!(resolve_selection(Some(&deselected)).is_empty());

        let empty = Catalog::default();
        assert!(resolve_selection(Some(&empty)).is_empty());
    }

    #[test]
    fn test_resolve_selection_ignores_unknown_streams() {
        let catalog = Catalog {
            streams: vec![entry("work_packages", Some(true)), entry("projects", Some(true))],
        };
        assert_eq!(resolve_selection(Some(&catalog)), vec!["projects"]);
    }

    #[test]
    fn test_minimal_catalog_json() {
        let catalog = Catalog::from_json(
            r#"{"streams": [{"tap_stream_id": "projects",
                "metadata": [{"breadcrumb": [], "metadata": {"selected": true}}]}]}"#,
        )
        .unwrap();
        assert_eq!(catalog.selected_streams(), vec!["projects"]);
    }

    #[test]
    fn test_invalid_catalog_json() {
        let err = Catalog::from_json("{").unwrap_err();
        assert!(matches!(err, Error::Catalog { .. }));
    }
}
