//! Search node configuration.
//!
//! A node carries the Solr connection settings, the names of the well-known
//! fields every indexed document has, the global relevance tuning and the
//! highlighting settings. Nodes and their field catalogs are normally stored
//! by the host application; [`NodeRegistry`] is a read-only, file-backed
//! implementation of both lookup services.
//!
//! # Example
//!
//! ```
//! use solr_querier::config::NodeSettings;
//!
//! let settings: NodeSettings = serde_json::from_str(r#"{"qf": "title_txt^2 body_txt"}"#).unwrap();
//! assert_eq!(settings.resource_name_field, "resource_name_s");
//! assert_eq!(settings.qf.as_deref(), Some("title_txt^2 body_txt"));
//! ```

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{FieldCatalogService, NodeId, SearchField};
use crate::error::{QuerierError, Result};

/// Connection settings for a Solr core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub secure: bool,
    pub hostname: String,
    pub port: u16,
    /// Core path, e.g. `solr/default`.
    pub path: String,
    pub login: Option<String>,
    pub password: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientSettings {
            secure: false,
            hostname: "localhost".to_string(),
            port: 8983,
            path: "solr/default".to_string(),
            login: None,
            password: None,
        }
    }
}

impl ClientSettings {
    /// URL of the core's select handler.
    pub fn select_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!(
            "{scheme}://{}:{}/{}/select",
            self.hostname,
            self.port,
            self.path.trim_matches('/')
        )
    }
}

/// Highlighting settings of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    pub highlighting: bool,
    #[serde(deserialize_with = "numeric_setting")]
    pub fragsize: Option<u64>,
    #[serde(deserialize_with = "numeric_setting")]
    pub snippets: Option<u64>,
    #[serde(rename = "maxAnalyzedChars", deserialize_with = "numeric_setting")]
    pub max_analyzed_chars: Option<u64>,
    /// Space-separated list of fields to highlight.
    pub fields: Option<String>,
}

/// Numeric settings come from free-form inputs: a number or a numeric string is
/// taken, anything else is treated as unset.
fn numeric_setting<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Settings of one search node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSettings {
    pub client: ClientSettings,
    /// Field holding the resource type token; also the grouping key.
    pub resource_name_field: String,
    pub sites_field: String,
    pub is_public_field: String,
    pub groups_field: String,
    /// Global field weighting, applied only when non-empty.
    pub qf: Option<String>,
    /// Global minimum-should-match, applied only when non-empty.
    pub mm: Option<String>,
    pub highlight: HighlightSettings,
}

impl Default for NodeSettings {
    fn default() -> Self {
        NodeSettings {
            client: ClientSettings::default(),
            resource_name_field: "resource_name_s".to_string(),
            sites_field: "sites_id_is".to_string(),
            is_public_field: "is_public_b".to_string(),
            groups_field: "groups_id_is".to_string(),
            qf: None,
            mm: None,
            highlight: HighlightSettings::default(),
        }
    }
}

/// Read-only lookup of node settings.
pub trait NodeSettingsService: Send + Sync {
    /// Settings of a node, or `None` when no such node exists.
    fn settings(&self, node_id: NodeId) -> Result<Option<NodeSettings>>;
}

/// A configured node together with its field catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub settings: NodeSettings,
    #[serde(default)]
    pub search_fields: Vec<SearchField>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    nodes: Vec<NodeConfig>,
}

/// In-memory node store implementing both lookup services.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: AHashMap<NodeId, NodeConfig>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a JSON file of the form `{"nodes": [...]}`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(content)?;
        let mut registry = NodeRegistry::new();
        for node in file.nodes {
            registry.add_node(node)?;
        }
        Ok(registry)
    }

    /// Register a node. Node ids must be unique.
    pub fn add_node(&mut self, node: NodeConfig) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(QuerierError::config(format!(
                "duplicate search node id {}",
                node.id
            )));
        }
        self.nodes.insert(node.id, node);
        Ok(())
    }

    pub fn node(&self, node_id: NodeId) -> Option<&NodeConfig> {
        self.nodes.get(&node_id)
    }

    /// Resolve a node by id or, failing that, by name.
    pub fn find(&self, key: &str) -> Option<&NodeConfig> {
        key.parse::<NodeId>()
            .ok()
            .and_then(|id| self.nodes.get(&id))
            .or_else(|| self.nodes.values().find(|n| n.name == key))
    }
}

impl NodeSettingsService for NodeRegistry {
    fn settings(&self, node_id: NodeId) -> Result<Option<NodeSettings>> {
        Ok(self.nodes.get(&node_id).map(|n| n.settings.clone()))
    }
}

impl FieldCatalogService for NodeRegistry {
    fn list(&self, node_id: NodeId) -> Result<Vec<SearchField>> {
        Ok(self
            .nodes
            .get(&node_id)
            .map(|n| n.search_fields.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = NodeSettings::default();
        assert_eq!(settings.resource_name_field, "resource_name_s");
        assert_eq!(settings.sites_field, "sites_id_is");
        assert_eq!(settings.is_public_field, "is_public_b");
        assert_eq!(settings.groups_field, "groups_id_is");
        assert_eq!(
            settings.client.select_url(),
            "http://localhost:8983/solr/default/select"
        );
        assert!(!settings.highlight.highlighting);
    }

    #[test]
    fn test_numeric_highlight_settings() {
        let settings: HighlightSettings = serde_json::from_str(
            r#"{"highlighting": true, "fragsize": "120", "snippets": 3, "maxAnalyzedChars": "lots"}"#,
        )
        .unwrap();
        assert!(settings.highlighting);
        assert_eq!(settings.fragsize, Some(120));
        assert_eq!(settings.snippets, Some(3));
        assert_eq!(settings.max_analyzed_chars, None);
    }

    #[test]
    fn test_registry_lookup() {
        let registry = NodeRegistry::from_json(
            r#"{"nodes": [{"id": 1, "name": "default", "search_fields": [{"name": "title", "text_fields": ["title_txt"]}]}]}"#,
        )
        .unwrap();

        assert!(registry.settings(1).unwrap().is_some());
        assert!(registry.settings(2).unwrap().is_none());
        assert_eq!(registry.list(1).unwrap().len(), 1);
        assert!(registry.list(2).unwrap().is_empty());
        assert_eq!(registry.find("default").unwrap().id, 1);
        assert_eq!(registry.find("1").unwrap().name, "default");
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let result = NodeRegistry::from_json(r#"{"nodes": [{"id": 1}, {"id": 1}]}"#);
        assert!(matches!(result, Err(QuerierError::Config(_))));
    }
}
