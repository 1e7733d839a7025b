//! Maps native Solr responses to [`NormalizedResponse`] values.
//!
//! Normalization is a pure function of the native response, the bounds found
//! by the bounds resolver and the catalog: the same inputs always give the
//! same output.

use log::warn;

use crate::catalog::FieldCatalog;
use crate::response::{DateStat, FacetCount, NativeResponse, NormalizedResponse};
use crate::search::bounds::StatBoundsMap;

/// Strip the `<type>:` prefix from an engine document id.
pub fn resource_id(doc_id: &str) -> &str {
    doc_id.split_once(':').map_or(doc_id, |(_, id)| id)
}

/// Normalizes responses for one node.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    catalog: &'a FieldCatalog,
    resource_field: &'a str,
}

impl<'a> Normalizer<'a> {
    pub fn new(catalog: &'a FieldCatalog, resource_field: &'a str) -> Self {
        Normalizer {
            catalog,
            resource_field,
        }
    }

    pub fn normalize(&self, response: &NativeResponse, bounds: &StatBoundsMap) -> NormalizedResponse {
        let mut normalized = NormalizedResponse::default();

        if let Some(grouped) = response.grouped.get(self.resource_field) {
            normalized.total_results = grouped.matches;
            for group in &grouped.groups {
                let resource = group.group_value.clone().unwrap_or_default();
                let results = normalized.per_resource_type.entry(resource).or_default();
                results.total = group.doclist.num_found;
                results.ids.extend(
                    group
                        .doclist
                        .docs
                        .iter()
                        .map(|doc| resource_id(&doc.id).to_string()),
                );
            }
        }

        if let Some(facet_counts) = &response.facet_counts {
            for (engine_field, counts) in &facet_counts.facet_fields {
                let Some(field) = self.catalog.by_facet_field(engine_field) else {
                    warn!("Ignoring facet counts of unmapped field {engine_field}");
                    continue;
                };
                for (value, count) in counts.pairs() {
                    if count > 0 {
                        normalized
                            .facets
                            .entry(field.name.clone())
                            .or_default()
                            .push(FacetCount { value, count });
                    }
                }
            }
        }

        if let Some(stats) = &response.stats {
            for (field, field_stats) in &stats.stats_fields {
                let Some(field_stats) = field_stats else {
                    continue;
                };
                let (total_min, total_max) = match bounds.get(field) {
                    Some(b) => (b.min.clone(), b.max.clone()),
                    None => (field_stats.min.clone(), field_stats.max.clone()),
                };
                normalized.date_stats.push(DateStat {
                    field: field.clone(),
                    min: field_stats.min.clone(),
                    max: field_stats.max.clone(),
                    total_min,
                    total_max,
                });
            }
        }

        normalized.highlighting = response.highlighting.clone();

        normalized
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::catalog::SearchField;
    use crate::search::bounds::StatBounds;

    fn catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            SearchField::new("subject").with_facet_field("subject_ss"),
        ])
    }

    fn native() -> NativeResponse {
        serde_json::from_value(json!({
            "grouped": {"resource_name_s": {"matches": 5, "groups": [
                {"groupValue": "items", "doclist": {"numFound": 4, "docs": [
                    {"id": "items:12"}, {"id": "items:3"}
                ]}},
                {"groupValue": "item_sets", "doclist": {"numFound": 1, "docs": [
                    {"id": "item_sets:7"}
                ]}}
            ]}},
            "facet_counts": {"facet_fields": {
                "subject_ss": ["Art", 3, "History", 0, "Music", 1],
                "orphan_ss": ["x", 1]
            }},
            "stats": {"stats_fields": {"date_is": {"min": 1990, "max": 2000}}},
            "highlighting": {"items:12": {"title_txt": ["a <mark>rare</mark> book"]}}
        }))
        .unwrap()
    }

    #[test]
    fn test_groups_and_ids() {
        let catalog = catalog();
        let normalized = Normalizer::new(&catalog, "resource_name_s")
            .normalize(&native(), &StatBoundsMap::new());

        assert_eq!(normalized.total_results, 5);
        assert_eq!(normalized.resource_total("items"), 4);
        assert_eq!(normalized.ids("items"), &["12", "3"]);
        assert_eq!(normalized.ids("item_sets"), &["7"]);
        assert_eq!(normalized.per_resource_type["items"].len(), 2);
        assert!(normalized.ids("media").is_empty());
    }

    #[test]
    fn test_zero_facet_counts_dropped() {
        let catalog = catalog();
        let normalized = Normalizer::new(&catalog, "resource_name_s")
            .normalize(&native(), &StatBoundsMap::new());

        assert_eq!(normalized.facet_count("subject", "Art"), Some(3));
        assert_eq!(normalized.facet_count("subject", "History"), None);
        assert_eq!(normalized.facet_count("subject", "Music"), Some(1));
        assert_eq!(normalized.facets.len(), 1);
    }

    #[test]
    fn test_stats_merge_bounds() {
        let catalog = catalog();
        let normalizer = Normalizer::new(&catalog, "resource_name_s");

        let without = normalizer.normalize(&native(), &StatBoundsMap::new());
        assert_eq!(without.date_stats[0].total_min, Value::from(1990));
        assert_eq!(without.date_stats[0].total_max, Value::from(2000));

        let mut bounds = StatBoundsMap::new();
        bounds.insert(
            "date_is".to_string(),
            StatBounds {
                min: Value::from(1850),
                max: Value::from(2021),
            },
        );
        let with = normalizer.normalize(&native(), &bounds);
        let stat = &with.date_stats[0];
        assert_eq!(stat.field, "date_is");
        assert_eq!(stat.min, Value::from(1990));
        assert_eq!(stat.max, Value::from(2000));
        assert_eq!(stat.total_min, Value::from(1850));
        assert_eq!(stat.total_max, Value::from(2021));
    }

    #[test]
    fn test_normalization_is_pure() {
        let catalog = catalog();
        let normalizer = Normalizer::new(&catalog, "resource_name_s");
        let response = native();

        let first = normalizer.normalize(&response, &StatBoundsMap::new());
        let second = normalizer.normalize(&response, &StatBoundsMap::new());
        assert_eq!(first, second);
        assert_eq!(
            first.highlighting.unwrap()["items:12"]["title_txt"],
            vec!["a <mark>rare</mark> book"]
        );
    }

    #[test]
    fn test_resource_id() {
        assert_eq!(resource_id("items:12"), "12");
        assert_eq!(resource_id("media:4:extra"), "4:extra");
        assert_eq!(resource_id("42"), "42");
    }
}
