//! Indexing-side value transformations.
//!
//! Transformations are pure functions over the values extracted for one
//! indexed field. They run before documents reach Solr and shape what the
//! querier later sees, e.g. year-only dates for the stats slider or
//! `[start TO end]` values for date range fields.
//!
//! # Available Transformations
//!
//! - [`date::DateYearTransformation`] - Reduces dates to their year
//! - [`date::DateRangeTransformation`] - Converts dates and year spans to Solr date ranges
//! - [`text::ExcludeContainingTransformation`] - Drops values containing a phrase
//! - [`text::IndexUriTransformation`] - Indexes both the label and the URI of linked values
//! - [`text::RemoveUriTransformation`] - Drops values that are bare URLs
//!
//! Transformations are looked up by name in a [`TransformationRegistry`];
//! callers resolve them explicitly instead of relying on hooks.
//!
//! # Examples
//!
//! ```
//! use solr_querier::transform::{IndexValue, TransformationRegistry};
//!
//! let registry = TransformationRegistry::with_defaults();
//! let values = vec![IndexValue::new("1990-05-12"), IndexValue::new("1850-1900")];
//! let years = registry.apply("date_year", values, &Default::default()).unwrap();
//!
//! let years: Vec<_> = years.iter().map(|v| v.value.as_str()).collect();
//! assert_eq!(years, vec!["1990", "1850", "1900"]);
//! ```

pub mod date;
pub mod text;

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{QuerierError, Result};

/// One extracted value, with the URI it links to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl IndexValue {
    pub fn new<S: Into<String>>(value: S) -> Self {
        IndexValue {
            value: value.into(),
            uri: None,
        }
    }

    pub fn with_uri<S: Into<String>>(mut self, uri: S) -> Self {
        self.uri = Some(uri.into());
        self
    }
}

/// Options of one transformation, as stored with the field mapping.
pub type TransformationOptions = Map<String, Value>;

/// Trait for transformations of extracted values.
pub trait Transformation: Send + Sync {
    /// Transform the values of one field.
    fn transform(&self, values: Vec<IndexValue>, options: &TransformationOptions) -> Vec<IndexValue>;

    /// Registry name.
    fn name(&self) -> &'static str;

    /// Label shown to administrators.
    fn label(&self) -> &'static str;
}

/// A transformation applied to a field, as configured on a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationSpec {
    pub name: String,
    #[serde(default)]
    pub options: TransformationOptions,
}

/// Transformations available by name.
#[derive(Clone, Default)]
pub struct TransformationRegistry {
    transformations: AHashMap<&'static str, Arc<dyn Transformation>>,
}

impl std::fmt::Debug for TransformationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.transformations.keys().collect();
        names.sort();
        f.debug_struct("TransformationRegistry")
            .field("transformations", &names)
            .finish()
    }
}

impl TransformationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in transformation.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(date::DateYearTransformation));
        registry.register(Arc::new(date::DateRangeTransformation));
        registry.register(Arc::new(text::ExcludeContainingTransformation));
        registry.register(Arc::new(text::IndexUriTransformation));
        registry.register(Arc::new(text::RemoveUriTransformation));
        registry
    }

    /// Register a transformation, replacing any with the same name.
    pub fn register(&mut self, transformation: Arc<dyn Transformation>) {
        self.transformations
            .insert(transformation.name(), transformation);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Transformation>> {
        self.transformations.get(name)
    }

    /// Apply one transformation by name.
    pub fn apply(
        &self,
        name: &str,
        values: Vec<IndexValue>,
        options: &TransformationOptions,
    ) -> Result<Vec<IndexValue>> {
        let transformation = self
            .get(name)
            .ok_or_else(|| QuerierError::config(format!("unknown transformation '{name}'")))?;
        Ok(transformation.transform(values, options))
    }

    /// Apply a chain of transformations in order.
    pub fn apply_all(
        &self,
        specs: &[TransformationSpec],
        values: Vec<IndexValue>,
    ) -> Result<Vec<IndexValue>> {
        specs
            .iter()
            .try_fold(values, |values, spec| self.apply(&spec.name, values, &spec.options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_transformation() {
        let registry = TransformationRegistry::with_defaults();
        let result = registry.apply("soundex", vec![], &TransformationOptions::new());
        assert!(matches!(result, Err(QuerierError::Config(_))));
    }

    #[test]
    fn test_chain() {
        let registry = TransformationRegistry::with_defaults();
        let specs: Vec<TransformationSpec> = serde_json::from_str(
            r#"[
                {"name": "remove_uri"},
                {"name": "exclude_containing", "options": {"phrase": "Fashion Institute of Technology"}}
            ]"#,
        )
        .unwrap();

        let values = vec![
            IndexValue::new("http://id.loc.gov/authorities/names/n79021164"),
            IndexValue::new("The Fashion Institute of Technology"),
            IndexValue::new("Jane Doe"),
        ];
        let result = registry.apply_all(&specs, values).unwrap();
        assert_eq!(result, vec![IndexValue::new("Jane Doe")]);
    }
}
