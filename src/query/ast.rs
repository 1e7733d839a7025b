//! The abstract query tree callers build without knowing Solr syntax.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QuerierError, Result};

/// How the children of a group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Match {
    Any,
    All,
}

impl Match {
    pub(crate) fn joiner(self) -> &'static str {
        match self {
            Match::Any => " OR ",
            Match::All => " AND ",
        }
    }
}

/// Term-matching operators understood by the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    ContainsAnyWord,
    ContainsAllWords,
    ContainsExpression,
    MatchesPattern,
}

impl Operator {
    pub const CONTAINS_ANY_WORD: &'static str = "in";
    pub const CONTAINS_ALL_WORDS: &'static str = "all";
    pub const CONTAINS_EXPRESSION: &'static str = "expr";
    pub const MATCHES_PATTERN: &'static str = "pattern";

    /// Parse an operator token.
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            Self::CONTAINS_ANY_WORD => Ok(Operator::ContainsAnyWord),
            Self::CONTAINS_ALL_WORDS => Ok(Operator::ContainsAllWords),
            Self::CONTAINS_EXPRESSION => Ok(Operator::ContainsExpression),
            Self::MATCHES_PATTERN => Ok(Operator::MatchesPattern),
            other => Err(QuerierError::unknown_operator(other)),
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Operator::ContainsAnyWord => Self::CONTAINS_ANY_WORD,
            Operator::ContainsAllWords => Self::CONTAINS_ALL_WORDS,
            Operator::ContainsExpression => Self::CONTAINS_EXPRESSION,
            Operator::MatchesPattern => Self::MATCHES_PATTERN,
        }
    }

    /// Label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Operator::ContainsAnyWord => "contains any word",
            Operator::ContainsAllWords => "contains all words",
            Operator::ContainsExpression => "contains expression",
            Operator::MatchesPattern => "matches pattern",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// An immutable abstract query.
///
/// Deserializes from a bare string (free text), a `{"match", "queries"}`
/// group or a `{"field", "operator", "term", "proximity"}` condition. The
/// operator stays a raw token until translation so an unknown one is reported
/// as [`QuerierError::UnknownOperator`] rather than as a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AbstractQuery {
    /// Free text, already escaped by the search form.
    Text(String),
    Group {
        #[serde(rename = "match")]
        match_: Match,
        #[serde(default)]
        queries: Vec<AbstractQuery>,
    },
    Field {
        field: String,
        operator: String,
        #[serde(default)]
        term: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        proximity: Option<u32>,
    },
}

impl Default for AbstractQuery {
    fn default() -> Self {
        AbstractQuery::Text(String::new())
    }
}

impl AbstractQuery {
    pub fn text<S: Into<String>>(text: S) -> Self {
        AbstractQuery::Text(text.into())
    }

    pub fn any(queries: Vec<AbstractQuery>) -> Self {
        AbstractQuery::Group {
            match_: Match::Any,
            queries,
        }
    }

    pub fn all(queries: Vec<AbstractQuery>) -> Self {
        AbstractQuery::Group {
            match_: Match::All,
            queries,
        }
    }

    pub fn field<F: Into<String>, T: Into<String>>(field: F, operator: Operator, term: T) -> Self {
        AbstractQuery::Field {
            field: field.into(),
            operator: operator.token().to_string(),
            term: term.into(),
            proximity: None,
        }
    }

    /// Attach a proximity to a field condition. Other nodes are returned unchanged.
    pub fn with_proximity(self, distance: u32) -> Self {
        match self {
            AbstractQuery::Field {
                field,
                operator,
                term,
                ..
            } => AbstractQuery::Field {
                field,
                operator,
                term,
                proximity: Some(distance),
            },
            other => other,
        }
    }
}
