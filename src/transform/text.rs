//! Text and link transformations.

use std::sync::LazyLock;

use regex::Regex;

use super::{IndexValue, Transformation, TransformationOptions};

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s/?#]+[^\s]*$").expect("URL pattern is valid")
});

/// Whether a value is a bare absolute URL.
pub fn is_url(value: &str) -> bool {
    URL.is_match(value)
}

/// Drops values containing the `phrase` option, ignoring case.
///
/// Without a phrase every value is kept.
#[derive(Clone, Debug, Default)]
pub struct ExcludeContainingTransformation;

impl Transformation for ExcludeContainingTransformation {
    fn transform(&self, values: Vec<IndexValue>, options: &TransformationOptions) -> Vec<IndexValue> {
        let phrase = match options.get("phrase").and_then(|p| p.as_str()) {
            Some(p) if !p.is_empty() => p.to_lowercase(),
            _ => return values,
        };
        values
            .into_iter()
            .filter(|v| !v.value.to_lowercase().contains(&phrase))
            .collect()
    }

    fn name(&self) -> &'static str {
        "exclude_containing"
    }

    fn label(&self) -> &'static str {
        "Omit values containing a phrase"
    }
}

/// Indexes both the label and the URI of linked values.
#[derive(Clone, Debug, Default)]
pub struct IndexUriTransformation;

impl Transformation for IndexUriTransformation {
    fn transform(&self, values: Vec<IndexValue>, _options: &TransformationOptions) -> Vec<IndexValue> {
        let mut transformed = Vec::with_capacity(values.len());
        for value in values {
            match value.uri {
                Some(uri) if !uri.is_empty() => {
                    transformed.push(IndexValue::new(value.value));
                    transformed.push(IndexValue::new(uri));
                }
                _ => transformed.push(value),
            }
        }
        transformed
    }

    fn name(&self) -> &'static str {
        "index_uri"
    }

    fn label(&self) -> &'static str {
        "Index URI and Label"
    }
}

/// Drops values that are bare URLs.
#[derive(Clone, Debug, Default)]
pub struct RemoveUriTransformation;

impl Transformation for RemoveUriTransformation {
    fn transform(&self, values: Vec<IndexValue>, _options: &TransformationOptions) -> Vec<IndexValue> {
        values.into_iter().filter(|v| !is_url(&v.value)).collect()
    }

    fn name(&self) -> &'static str {
        "remove_uri"
    }

    fn label(&self) -> &'static str {
        "Remove URI"
    }
}
