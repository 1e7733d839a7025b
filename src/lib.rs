//! # solr-querier
//!
//! Translates abstract search queries into Solr requests and normalizes the
//! responses into an engine-independent result.
//!
//! ## Features
//!
//! - Query trees with per-field operators, translated against a field catalog
//! - Facets, facet filters, date ranges, statistics, sorting and paging
//! - Date-range bounds computed over the unfiltered population
//! - Pluggable transport, with an HTTP implementation behind the `http` feature
//! - Indexing-side value transformations

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod query;
pub mod response;
pub mod search;
pub mod transform;
pub mod transport;

pub mod prelude {
    pub use crate::catalog::{FieldCatalog, FieldCatalogService, SearchField};
    pub use crate::config::{NodeRegistry, NodeSettings, NodeSettingsService};
    pub use crate::error::{QuerierError, Result};
    pub use crate::query::{AbstractQuery, DateRange, FacetValue, FilterSet, Operator, Sort};
    pub use crate::response::NormalizedResponse;
    pub use crate::search::Querier;
    pub use crate::transport::Transport;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
