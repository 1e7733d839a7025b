//! Builds a [`NativeRequest`] from an abstract query and its filters.
//!
//! Every field reference is resolved through the node's [`FieldCatalog`]
//! while building, so a bad reference fails here, before anything is sent.

use crate::catalog::FieldCatalog;
use crate::config::NodeSettings;
use crate::error::{QuerierError, Result};
use crate::query::ast::AbstractQuery;
use crate::query::escape::enclose;
use crate::query::filter::{FacetValue, FilterSet, Visibility};
use crate::query::request::{
    FilterKind, Grouping, Highlight, MATCH_ALL, NativeRequest, SortClause,
};
use crate::query::translate::Translator;

/// Identifier field requested for every hit.
pub const ID_FIELD: &str = "id";

/// A built request and what the response handling needs to know about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub request: NativeRequest,
    /// At least one date-range clause was emitted.
    pub date_range_active: bool,
}

/// Builds native requests for one node.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    catalog: &'a FieldCatalog,
    settings: &'a NodeSettings,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(catalog: &'a FieldCatalog, settings: &'a NodeSettings) -> Self {
        QueryBuilder { catalog, settings }
    }

    /// Build the request for `query` under `filters`.
    pub fn build(&self, query: &AbstractQuery, filters: &FilterSet) -> Result<BuiltQuery> {
        let settings = self.settings;
        let resources: Vec<&str> = filters
            .resources
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .collect();
        if resources.is_empty() {
            return Err(QuerierError::invalid_query("no resource type to search"));
        }

        let translator = Translator::new(self.catalog);
        let mut request = NativeRequest::default();
        let mut highlight_parts: Vec<String> = Vec::new();

        request.qf = non_empty(&settings.qf);
        request.mm = non_empty(&settings.mm);

        let mut user_fields = Vec::new();
        for field in self.catalog.user_fields() {
            request
                .field_aliases
                .push((field.name.clone(), field.text_fields.join(" ")));
            user_fields.push(field.name.as_str());
        }
        if !user_fields.is_empty() {
            request.user_fields = user_fields.join(" ");
        }

        let q = translator.translate(query)?;
        if q.is_empty() {
            request.q = MATCH_ALL.to_string();
        } else {
            highlight_parts.push(q.clone());
            request.q = q;
        }

        request.fields.push(ID_FIELD.to_string());
        request.group = Some(Grouping {
            field: settings.resource_name_field.clone(),
            limit: None,
            offset: None,
        });

        request.add_filter(
            FilterKind::ResourceType,
            format!(
                "{}:({})",
                settings.resource_name_field,
                resources.join(" OR ")
            ),
        );

        if let Some(site) = filters.site {
            request.add_filter(FilterKind::Site, format!("{}:{site}", settings.sites_field));
        }

        match &filters.visibility {
            Some(Visibility::Public { groups }) => {
                let mut clause = format!("{}:true", settings.is_public_field);
                for group in groups.iter().flatten() {
                    clause.push_str(&format!(" OR {}:{group}", settings.groups_field));
                }
                request.add_filter(FilterKind::Visibility, clause);
            }
            Some(Visibility::Private) => {
                request.add_filter(
                    FilterKind::Visibility,
                    format!("{}:false", settings.is_public_field),
                );
            }
            None => {}
        }

        if !filters.facet_fields.is_empty() {
            request.facet = true;
            for name in &filters.facet_fields {
                let facet_field = self.catalog.facet_field(name)?;
                request.facet_fields.push(facet_field.to_string());
            }
        }
        if filters.facet_limit > 0 {
            request.facet_limit = Some(filters.facet_limit);
        }

        for (name, values) in &filters.facet_filters {
            let facet_field = self.catalog.facet_field(name)?;
            for value in values {
                if let Some(value) = facet_filter_value(value) {
                    request.add_filter(FilterKind::Facet, format!("{facet_field}:{value}"));
                }
            }
        }

        for query_filter in &filters.query_filters {
            let fq = translator.translate(query_filter)?;
            if !fq.is_empty() {
                highlight_parts.push(fq.clone());
                request.add_filter(FilterKind::Query, fq);
            }
        }

        let mut date_range_active = false;
        for (name, ranges) in &filters.date_range_filters {
            for range in ranges {
                // Inverted ranges are left for Solr to interpret.
                request.add_filter(
                    FilterKind::DateRange,
                    format!("{name}:[{} TO {}]", range.start_bound(), range.end_bound()),
                );
                date_range_active = true;
            }
        }

        if !filters.stat_fields.is_empty() {
            request.stats = true;
            request.stats_fields = filters.stat_fields.clone();
        }

        let hl = &settings.highlight;
        if hl.highlighting {
            let query = if highlight_parts.is_empty() {
                None
            } else {
                Some(
                    highlight_parts
                        .iter()
                        .map(|part| format!("({part})"))
                        .collect::<Vec<_>>()
                        .join(" AND "),
                )
            };
            request.highlight = Some(Highlight {
                fragsize: hl.fragsize,
                snippets: hl.snippets,
                max_analyzed_chars: hl.max_analyzed_chars,
                query,
                fields: hl
                    .fields
                    .as_deref()
                    .filter(|f| !f.is_empty())
                    .map(|f| f.replace(' ', ",")),
            });
        }

        if let Some(sort) = filters.sort.as_ref() {
            let field = if sort.is_relevance() {
                sort.field.clone()
            } else {
                self.catalog.sort_field(&sort.field)?.to_string()
            };
            request.sort = Some(SortClause {
                field,
                direction: sort.direction,
            });
        }

        if let Some(group) = request.group.as_mut() {
            if filters.limit > 0 {
                group.limit = Some(filters.limit);
            }
            if filters.offset > 0 {
                group.offset = Some(filters.offset);
            }
        }

        Ok(BuiltQuery {
            request,
            date_range_active,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Render a facet filter value, or `None` when nothing is left after
/// dropping empty entries.
fn facet_filter_value(value: &FacetValue) -> Option<String> {
    match value {
        FacetValue::Scalar(v) if v.is_empty() => None,
        FacetValue::Scalar(v) => Some(enclose(v)),
        FacetValue::AnyOf(values) => {
            let alternatives: Vec<String> = values
                .iter()
                .filter(|v| !v.is_empty())
                .map(|v| enclose(v))
                .collect();
            if alternatives.is_empty() {
                None
            } else {
                Some(format!("({})", alternatives.join(" OR ")))
            }
        }
    }
}
