//! The native Solr request produced by the builder.

use serde::{Deserialize, Serialize};

use crate::query::filter::SortDirection;

/// Match-all query.
pub const MATCH_ALL: &str = "*:*";

/// Highlight markers.
pub const HIGHLIGHT_PRE: &str = "<mark>";
pub const HIGHLIGHT_POST: &str = "</mark>";

/// What produced a filter clause.
///
/// Tagging clauses lets the bounds resolver drop exactly the date-range
/// clauses without pattern matching on their text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    ResourceType,
    Site,
    Visibility,
    Facet,
    Query,
    DateRange,
}

/// One `fq` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    pub kind: FilterKind,
    pub clause: String,
}

/// Grouping parameters. Results are always grouped on the resource type field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    pub field: String,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub fragsize: Option<u64>,
    pub snippets: Option<u64>,
    pub max_analyzed_chars: Option<u64>,
    /// `hl.q`: the AND of every query and filter-query fragment.
    pub query: Option<String>,
    /// `hl.fl`, comma-separated.
    pub fields: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortClause {
    pub field: String,
    pub direction: SortDirection,
}

/// A fully built Solr select request.
///
/// Requests are plain values: the compensating bounds request is derived with
/// [`NativeRequest::without_date_ranges`] instead of mutating the primary one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeRequest {
    pub def_type: String,
    pub qf: Option<String>,
    pub mm: Option<String>,
    /// Per user field `f.<name>.qf` aliases.
    pub field_aliases: Vec<(String, String)>,
    /// Allowed user fields (`uf`).
    pub user_fields: String,
    pub q: String,
    pub fields: Vec<String>,
    pub group: Option<Grouping>,
    pub filters: Vec<FilterQuery>,
    pub facet: bool,
    pub facet_fields: Vec<String>,
    pub facet_limit: Option<usize>,
    pub stats: bool,
    pub stats_fields: Vec<String>,
    pub highlight: Option<Highlight>,
    pub sort: Option<SortClause>,
    pub rows: Option<usize>,
    pub omit_header: bool,
}

impl Default for NativeRequest {
    fn default() -> Self {
        NativeRequest {
            def_type: "edismax".to_string(),
            qf: None,
            mm: None,
            field_aliases: Vec::new(),
            user_fields: "-*".to_string(),
            q: MATCH_ALL.to_string(),
            fields: Vec::new(),
            group: None,
            filters: Vec::new(),
            facet: false,
            facet_fields: Vec::new(),
            facet_limit: None,
            stats: false,
            stats_fields: Vec::new(),
            highlight: None,
            sort: None,
            rows: None,
            omit_header: false,
        }
    }
}

impl NativeRequest {
    pub fn add_filter<S: Into<String>>(&mut self, kind: FilterKind, clause: S) {
        self.filters.push(FilterQuery {
            kind,
            clause: clause.into(),
        });
    }

    /// Filter clauses in insertion order.
    pub fn filter_clauses(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|f| f.clause.as_str())
    }

    pub fn has_date_range_filter(&self) -> bool {
        self.filters.iter().any(|f| f.kind == FilterKind::DateRange)
    }

    /// Derive the request computing a stat field's bounds over the
    /// date-unfiltered population: date-range clauses removed, no grouping,
    /// faceting or highlighting, no rows, stats on `stat_field` only.
    pub fn without_date_ranges(&self, stat_field: &str) -> NativeRequest {
        let mut request = self.clone();
        request.filters.retain(|f| f.kind != FilterKind::DateRange);
        request.group = None;
        request.facet = false;
        request.facet_fields.clear();
        request.facet_limit = None;
        request.highlight = None;
        request.rows = Some(0);
        request.omit_header = true;
        request.stats = true;
        request.stats_fields = vec![stat_field.to_string()];
        request
    }

    /// Render the request as Solr query parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = Vec::new();
        let mut push = |key: &str, value: String| params.push((key.to_string(), value));

        push("defType", self.def_type.clone());
        if let Some(qf) = &self.qf {
            push("qf", qf.clone());
        }
        if let Some(mm) = &self.mm {
            push("mm", mm.clone());
        }
        for (name, fields) in &self.field_aliases {
            push(&format!("f.{name}.qf"), fields.clone());
        }
        push("uf", self.user_fields.clone());
        push("q", self.q.clone());
        if !self.fields.is_empty() {
            push("fl", self.fields.join(","));
        }

        if let Some(group) = &self.group {
            push("group", "true".to_string());
            push("group.field", group.field.clone());
            if let Some(limit) = group.limit {
                push("group.limit", limit.to_string());
            }
            if let Some(offset) = group.offset {
                push("group.offset", offset.to_string());
            }
        }

        for filter in &self.filters {
            push("fq", filter.clause.clone());
        }

        if self.facet {
            push("facet", "true".to_string());
            for field in &self.facet_fields {
                push("facet.field", field.clone());
            }
            if let Some(limit) = self.facet_limit {
                push("facet.limit", limit.to_string());
            }
        }

        if self.stats {
            push("stats", "true".to_string());
            for field in &self.stats_fields {
                push("stats.field", field.clone());
            }
        }

        if let Some(hl) = &self.highlight {
            push("hl", "true".to_string());
            push("hl.simple.pre", HIGHLIGHT_PRE.to_string());
            push("hl.simple.post", HIGHLIGHT_POST.to_string());
            if let Some(fragsize) = hl.fragsize {
                push("hl.fragsize", fragsize.to_string());
            }
            if let Some(snippets) = hl.snippets {
                push("hl.snippets", snippets.to_string());
            }
            if let Some(max) = hl.max_analyzed_chars {
                push("hl.maxAnalyzedChars", max.to_string());
            }
            if let Some(query) = &hl.query {
                push("hl.q", query.clone());
            }
            if let Some(fields) = &hl.fields {
                push("hl.fl", fields.clone());
            }
        }

        if let Some(sort) = &self.sort {
            let direction = match sort.direction {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            };
            push("sort", format!("{} {direction}", sort.field));
        }

        if let Some(rows) = self.rows {
            push("rows", rows.to_string());
        }
        if self.omit_header {
            push("omitHeader", "true".to_string());
        }
        push("wt", "json".to_string());

        params
    }

    /// Human-readable `key=value&...` form, used in debug logs.
    pub fn to_query_string(&self) -> String {
        self.to_params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}
