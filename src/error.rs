//! Error types for the querier.
//!
//! Every failure a caller can observe is a [`QuerierError`]. The variants keep
//! the precise cause around for logging and tests, while [`QuerierError::kind`]
//! collapses them into the single [`ErrorKind`] callers are expected to match on.
//!
//! # Examples
//!
//! ```
//! use solr_querier::error::{ErrorKind, QuerierError, Result};
//!
//! fn lookup() -> Result<()> {
//!     Err(QuerierError::unknown_field("dcterms:title"))
//! }
//!
//! let err = lookup().unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Querier);
//! assert_eq!(err.to_string(), "Field dcterms:title does not exist");
//! ```

use std::io;

use thiserror::Error;

/// The main error type for querier operations.
#[derive(Error, Debug)]
pub enum QuerierError {
    /// A logical field name is absent from the node's field catalog.
    #[error("Field {0} does not exist")]
    UnknownField(String),

    /// The field exists but has no facet mapping.
    #[error("Field {0} is not facetable")]
    FieldNotFacetable(String),

    /// The field exists but has no sort mapping.
    #[error("Field {0} is not sortable")]
    FieldNotSortable(String),

    /// The field lacks the capability the operator needs.
    #[error("Field {field} cannot be used with \"{operator}\" operator")]
    UnsupportedOperator { field: String, operator: String },

    /// The operator token is not recognized.
    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    /// The transport failed. Code and message are passed through verbatim.
    #[error("{message}")]
    Transport { code: i32, message: String },

    /// The request cannot be expressed as a Solr query.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// No search node is configured, or the configured one does not exist.
    #[error("Search node is not configured: {0}")]
    UnconfiguredNode(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (configuration files, saved responses)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// The single error class callers observe.
///
/// Query building, node lookup and transport failures all surface as
/// [`ErrorKind::Querier`]; only local plumbing (files, JSON) differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Querier,
    Io,
}

/// Result type alias for operations that may fail with QuerierError.
pub type Result<T> = std::result::Result<T, QuerierError>;

impl QuerierError {
    /// Create a new unknown field error.
    pub fn unknown_field<S: Into<String>>(field: S) -> Self {
        QuerierError::UnknownField(field.into())
    }

    /// Create a new not-facetable error.
    pub fn not_facetable<S: Into<String>>(field: S) -> Self {
        QuerierError::FieldNotFacetable(field.into())
    }

    /// Create a new not-sortable error.
    pub fn not_sortable<S: Into<String>>(field: S) -> Self {
        QuerierError::FieldNotSortable(field.into())
    }

    /// Create a new unsupported operator error.
    pub fn unsupported_operator<F: Into<String>, O: Into<String>>(field: F, operator: O) -> Self {
        QuerierError::UnsupportedOperator {
            field: field.into(),
            operator: operator.into(),
        }
    }

    /// Create a new unknown operator error.
    pub fn unknown_operator<S: Into<String>>(operator: S) -> Self {
        QuerierError::UnknownOperator(operator.into())
    }

    /// Create a new transport error.
    pub fn transport<S: Into<String>>(code: i32, message: S) -> Self {
        QuerierError::Transport {
            code,
            message: message.into(),
        }
    }

    /// Create a new invalid query error.
    pub fn invalid_query<S: Into<String>>(msg: S) -> Self {
        QuerierError::InvalidQuery(msg.into())
    }

    /// Create a new unconfigured node error.
    pub fn unconfigured<S: Into<String>>(msg: S) -> Self {
        QuerierError::UnconfiguredNode(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        QuerierError::Config(msg.into())
    }

    /// The error class seen by callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuerierError::Io(_) | QuerierError::Json(_) => ErrorKind::Io,
            _ => ErrorKind::Querier,
        }
    }

    /// Transport status code, zero for errors that did not come from the wire.
    pub fn code(&self) -> i32 {
        match self {
            QuerierError::Transport { code, .. } => *code,
            _ => 0,
        }
    }
}
