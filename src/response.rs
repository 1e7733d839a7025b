//! Native Solr responses and the normalized result handed back to callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Highlight fragments: document id to field to fragments.
pub type Highlighting = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// The parts of a Solr select response the querier reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeResponse {
    #[serde(default)]
    pub grouped: BTreeMap<String, GroupedField>,
    #[serde(default)]
    pub facet_counts: Option<FacetCounts>,
    #[serde(default)]
    pub stats: Option<Stats>,
    #[serde(default)]
    pub highlighting: Option<Highlighting>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedField {
    #[serde(default)]
    pub matches: u64,
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// `null` for documents without a value in the group field.
    #[serde(rename = "groupValue", default)]
    pub group_value: Option<String>,
    pub doclist: DocList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocList {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<Doc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doc {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetCounts {
    #[serde(default)]
    pub facet_fields: BTreeMap<String, FacetFieldCounts>,
}

/// Facet counts of one field.
///
/// Solr writes them as a flat `[value, count, value, count]` list by default
/// and as an object with `json.nl=map`; both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetFieldCounts {
    Flat(Vec<Value>),
    Map(serde_json::Map<String, Value>),
}

impl FacetFieldCounts {
    /// `(value, count)` pairs in response order. Malformed entries are skipped.
    pub fn pairs(&self) -> Vec<(String, u64)> {
        match self {
            FacetFieldCounts::Flat(items) => items
                .chunks_exact(2)
                .filter_map(|pair| Some((facet_key(&pair[0])?, pair[1].as_u64()?)))
                .collect(),
            FacetFieldCounts::Map(map) => map
                .iter()
                .filter_map(|(value, count)| Some((value.clone(), count.as_u64()?)))
                .collect(),
        }
    }
}

fn facet_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub stats_fields: BTreeMap<String, Option<FieldStats>>,
}

/// Statistics of one field. Min and max are numbers or date strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    #[serde(default)]
    pub min: Value,
    #[serde(default)]
    pub max: Value,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub missing: Option<u64>,
}

impl NativeResponse {
    /// Stats of a field, if the response has any.
    pub fn field_stats(&self, field: &str) -> Option<&FieldStats> {
        self.stats.as_ref()?.stats_fields.get(field)?.as_ref()
    }
}

/// Hits of one resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceResults {
    pub total: u64,
    /// Resource ids in ranking order.
    pub ids: Vec<String>,
}

impl ResourceResults {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

/// Bounds of a statistics field. `total_min`/`total_max` ignore date-range filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateStat {
    pub field: String,
    pub min: Value,
    pub max: Value,
    pub total_min: Value,
    pub total_max: Value,
}

/// The engine-independent result of a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub total_results: u64,
    pub per_resource_type: BTreeMap<String, ResourceResults>,
    /// Logical field to positive value counts, in engine order.
    pub facets: BTreeMap<String, Vec<FacetCount>>,
    pub date_stats: Vec<DateStat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighting: Option<Highlighting>,
}

impl NormalizedResponse {
    pub fn resource_total(&self, resource: &str) -> u64 {
        self.per_resource_type.get(resource).map_or(0, |r| r.total)
    }

    pub fn ids(&self, resource: &str) -> &[String] {
        self.per_resource_type
            .get(resource)
            .map(|r| r.ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn facet_count(&self, field: &str, value: &str) -> Option<u64> {
        self.facets
            .get(field)?
            .iter()
            .find(|f| f.value == value)
            .map(|f| f.count)
    }
}
