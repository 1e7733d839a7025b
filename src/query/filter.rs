//! Filters, facets, statistics, sorting and paging requested with a query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::query::ast::AbstractQuery;

/// Sort field meaning "by relevance".
pub const RELEVANCE: &str = "score";

/// A facet filter value: one value, or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetValue {
    Scalar(String),
    AnyOf(Vec<String>),
}

impl From<&str> for FacetValue {
    fn from(value: &str) -> Self {
        FacetValue::Scalar(value.to_string())
    }
}

impl From<Vec<&str>> for FacetValue {
    fn from(values: Vec<&str>) -> Self {
        FacetValue::AnyOf(values.into_iter().map(str::to_string).collect())
    }
}

/// One date range. Missing or empty ends are unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: Option<&str>, end: Option<&str>) -> Self {
        DateRange {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        }
    }

    pub fn between(start: &str, end: &str) -> Self {
        Self::new(Some(start), Some(end))
    }

    pub(crate) fn start_bound(&self) -> &str {
        bound(&self.start)
    }

    pub(crate) fn end_bound(&self) -> &str {
        bound(&self.end)
    }
}

fn bound(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => "*",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `asc` is ascending, any other token descending.
    pub fn from_token(token: &str) -> Self {
        if token == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new<S: Into<String>>(field: S, direction: SortDirection) -> Self {
        Sort {
            field: field.into(),
            direction,
        }
    }

    /// Parse a `"<field> <direction>"` sort string.
    pub fn parse(sort: &str) -> Option<Self> {
        let mut parts = sort.split_whitespace();
        let field = parts.next()?;
        let direction = SortDirection::from_token(parts.next().unwrap_or("desc"));
        Some(Sort::new(field, direction))
    }

    pub fn is_relevance(&self) -> bool {
        self.field == RELEVANCE
    }
}

/// Visibility scope of the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Public resources, plus private ones shared with any of these groups.
    Public {
        #[serde(default)]
        groups: Option<Vec<u64>>,
    },
    Private,
}

/// Everything a caller asks for besides the main query.
///
/// Maps are ordered so the generated filter clauses are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    /// Resource type tokens to search (e.g. `items`, `item_sets`).
    pub resources: Vec<String>,
    pub facet_fields: Vec<String>,
    /// Maximum number of values per facet; zero means engine default.
    pub facet_limit: usize,
    pub facet_filters: BTreeMap<String, Vec<FacetValue>>,
    pub date_range_filters: BTreeMap<String, Vec<DateRange>>,
    pub query_filters: Vec<AbstractQuery>,
    pub stat_fields: Vec<String>,
    pub sort: Option<Sort>,
    /// Per resource type page size; zero means engine default.
    pub limit: usize,
    pub offset: usize,
    pub visibility: Option<Visibility>,
    pub site: Option<u64>,
}

impl FilterSet {
    pub fn new<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterSet {
            resources: resources.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn add_facet_field<S: Into<String>>(mut self, field: S) -> Self {
        self.facet_fields.push(field.into());
        self
    }

    pub fn add_facet_filter<S: Into<String>, V: Into<FacetValue>>(mut self, field: S, value: V) -> Self {
        self.facet_filters
            .entry(field.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn add_date_range<S: Into<String>>(mut self, field: S, range: DateRange) -> Self {
        self.date_range_filters
            .entry(field.into())
            .or_default()
            .push(range);
        self
    }

    pub fn add_query_filter(mut self, query: AbstractQuery) -> Self {
        self.query_filters.push(query);
        self
    }

    pub fn add_stat_field<S: Into<String>>(mut self, field: S) -> Self {
        self.stat_fields.push(field.into());
        self
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_site(mut self, site: u64) -> Self {
        self.site = Some(site);
        self
    }
}
