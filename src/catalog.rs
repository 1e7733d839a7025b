//! Field catalog: maps logical search fields to the Solr fields backing them.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{QuerierError, Result};

/// Identifier of a configured search node.
pub type NodeId = u64;

/// A logical search field and the engine fields backing each capability.
///
/// A field with no text fields cannot be used with the word operators, a field
/// without string fields cannot be pattern matched, and so on. Each capability
/// is an explicit slot rather than something probed at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchField {
    /// Logical name, unique per node.
    pub name: String,
    /// Human-readable label.
    #[serde(default)]
    pub label: Option<String>,
    /// Tokenized Solr fields, in query order.
    #[serde(default, deserialize_with = "field_list")]
    pub text_fields: Vec<String>,
    /// Untokenized Solr fields used for pattern matching.
    #[serde(default, deserialize_with = "field_list")]
    pub string_fields: Vec<String>,
    #[serde(default)]
    pub facet_field: Option<String>,
    #[serde(default)]
    pub sort_field: Option<String>,
}

impl SearchField {
    pub fn new<S: Into<String>>(name: S) -> Self {
        SearchField {
            name: name.into(),
            label: None,
            text_fields: Vec::new(),
            string_fields: Vec::new(),
            facet_field: None,
            sort_field: None,
        }
    }

    pub fn with_text_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_string_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.string_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_facet_field<S: Into<String>>(mut self, field: S) -> Self {
        self.facet_field = Some(field.into());
        self
    }

    pub fn with_sort_field<S: Into<String>>(mut self, field: S) -> Self {
        self.sort_field = Some(field.into());
        self
    }

    pub fn has_text_fields(&self) -> bool {
        !self.text_fields.is_empty()
    }

    pub fn has_string_fields(&self) -> bool {
        !self.string_fields.is_empty()
    }
}

/// Accepts either a JSON list of names or a single space-separated string,
/// which is how the admin forms store them.
fn field_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Joined(String),
        Null(()),
    }

    let fields = match Raw::deserialize(deserializer)? {
        Raw::List(list) => list,
        Raw::Joined(joined) => joined.split(' ').map(str::to_string).collect(),
        Raw::Null(()) => Vec::new(),
    };

    Ok(fields
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect())
}

/// The field catalog of one node, loaded for the duration of one execution.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: Vec<SearchField>,
    by_name: AHashMap<String, usize>,
    by_facet_field: AHashMap<String, usize>,
}

impl FieldCatalog {
    /// Build a catalog from the ordered field list returned by the lookup service.
    ///
    /// Names are trimmed. When two entries share a name the later one wins, as
    /// does the later entry for a shared facet field.
    pub fn new(fields: Vec<SearchField>) -> Self {
        let mut catalog = FieldCatalog::default();
        for mut field in fields {
            field.name = field.name.trim().to_string();
            let facet_field = field.facet_field.clone().filter(|f| !f.is_empty());
            let index = match catalog.by_name.get(&field.name) {
                Some(&index) => {
                    let replaced = std::mem::replace(&mut catalog.fields[index], field);
                    if let Some(old) = replaced.facet_field
                        && catalog.by_facet_field.get(&old) == Some(&index)
                    {
                        catalog.by_facet_field.remove(&old);
                    }
                    index
                }
                None => {
                    let index = catalog.fields.len();
                    catalog.by_name.insert(field.name.clone(), index);
                    catalog.fields.push(field);
                    index
                }
            };
            if let Some(facet_field) = facet_field {
                catalog.by_facet_field.insert(facet_field, index);
            }
        }
        catalog
    }

    /// Look a logical field up by name.
    pub fn get(&self, name: &str) -> Option<&SearchField> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Look a logical field up by name, failing with `UnknownField`.
    pub fn resolve(&self, name: &str) -> Result<&SearchField> {
        self.get(name).ok_or_else(|| QuerierError::unknown_field(name))
    }

    /// Resolve a field and return its facet mapping.
    pub fn facet_field(&self, name: &str) -> Result<&str> {
        self.resolve(name)?
            .facet_field
            .as_deref()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| QuerierError::not_facetable(name))
    }

    /// Resolve a field and return its sort mapping.
    pub fn sort_field(&self, name: &str) -> Result<&str> {
        self.resolve(name)?
            .sort_field
            .as_deref()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| QuerierError::not_sortable(name))
    }

    /// Inverse facet lookup: Solr facet field to the logical field owning it.
    pub fn by_facet_field(&self, facet_field: &str) -> Option<&SearchField> {
        self.by_facet_field.get(facet_field).map(|&i| &self.fields[i])
    }

    /// Fields exposing at least one text field, in catalog order.
    pub fn user_fields(&self) -> impl Iterator<Item = &SearchField> {
        self.fields.iter().filter(|f| f.has_text_fields())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read-only lookup of a node's field catalog.
pub trait FieldCatalogService: Send + Sync {
    /// List the search fields configured for a node, in catalog order.
    fn list(&self, node_id: NodeId) -> Result<Vec<SearchField>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            SearchField::new(" title ")
                .with_text_fields(["dcterms_title_txt", "dcterms_alternative_txt"])
                .with_string_fields(["dcterms_title_s"])
                .with_sort_field("dcterms_title_s"),
            SearchField::new("subject").with_facet_field("dcterms_subject_ss"),
        ])
    }

    #[test]
    fn test_lookup_by_trimmed_name() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("title").is_some());
        assert!(catalog.get(" title ").is_none());
    }

    #[test]
    fn test_capability_errors() {
        let catalog = sample_catalog();

        assert!(matches!(
            catalog.resolve("creator"),
            Err(QuerierError::UnknownField(name)) if name == "creator"
        ));
        assert!(matches!(
            catalog.facet_field("title"),
            Err(QuerierError::FieldNotFacetable(_))
        ));
        assert!(matches!(
            catalog.sort_field("subject"),
            Err(QuerierError::FieldNotSortable(_))
        ));
        assert!(matches!(
            catalog.facet_field("creator"),
            Err(QuerierError::UnknownField(_))
        ));
        assert_eq!(catalog.sort_field("title").unwrap(), "dcterms_title_s");
    }

    #[test]
    fn test_inverse_facet_lookup() {
        let catalog = sample_catalog();
        let field = catalog.by_facet_field("dcterms_subject_ss").unwrap();
        assert_eq!(field.name, "subject");
        assert!(catalog.by_facet_field("dcterms_title_s").is_none());
    }

    #[test]
    fn test_replaced_field_drops_old_facet_mapping() {
        let catalog = FieldCatalog::new(vec![
            SearchField::new("subject").with_facet_field("old_ss"),
            SearchField::new("subject").with_facet_field("new_ss"),
        ]);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.by_facet_field("old_ss").is_none());
        assert_eq!(catalog.by_facet_field("new_ss").unwrap().name, "subject");
        assert_eq!(catalog.facet_field("subject").unwrap(), "new_ss");
    }

    #[test]
    fn test_user_fields_require_text_fields() {
        let catalog = sample_catalog();
        let names: Vec<_> = catalog.user_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title"]);
    }

    #[test]
    fn test_deserialize_space_separated_fields() {
        let field: SearchField = serde_json::from_str(
            r#"{"name": "title", "text_fields": "a_txt  b_txt", "string_fields": null}"#,
        )
        .unwrap();
        assert_eq!(field.text_fields, vec!["a_txt", "b_txt"]);
        assert!(field.string_fields.is_empty());
        assert!(field.facet_field.is_none());
    }
}
