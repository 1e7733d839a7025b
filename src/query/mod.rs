//! Query model and its translation into Solr requests.

pub mod ast;
pub mod builder;
pub mod escape;
pub mod filter;
pub mod request;
pub mod translate;

// Re-export commonly used types
pub use ast::{AbstractQuery, Match, Operator};
pub use builder::{BuiltQuery, QueryBuilder};
pub use filter::{DateRange, FacetValue, FilterSet, Sort, SortDirection, Visibility};
pub use request::{FilterKind, NativeRequest};
pub use translate::Translator;
