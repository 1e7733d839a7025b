//! Translation of abstract queries into Solr boolean query strings.

use crate::catalog::FieldCatalog;
use crate::error::{QuerierError, Result};
use crate::query::ast::{AbstractQuery, Operator};
use crate::query::escape::{escape, escape_pattern};

/// Translates [`AbstractQuery`] trees against a field catalog.
///
/// The translator is stateless; every call resolves fields afresh. An empty
/// result means "no constraint" and is dropped by enclosing groups.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    catalog: &'a FieldCatalog,
}

impl<'a> Translator<'a> {
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        Translator { catalog }
    }

    /// Translate a query tree into a query string.
    pub fn translate(&self, query: &AbstractQuery) -> Result<String> {
        match query {
            // Free text is escaped by the search form; escaping again would
            // break URI searches.
            AbstractQuery::Text(text) => Ok(text.clone()),
            AbstractQuery::Group { match_, queries } => {
                let mut parts = Vec::with_capacity(queries.len());
                for child in queries {
                    let part = self.translate(child)?;
                    if !part.is_empty() {
                        parts.push(part);
                    }
                }
                if parts.is_empty() {
                    Ok(String::new())
                } else {
                    Ok(format!("({})", parts.join(match_.joiner())))
                }
            }
            AbstractQuery::Field {
                field,
                operator,
                term,
                proximity,
            } => {
                if term.is_empty() {
                    return Ok(String::new());
                }
                self.translate_condition(field, operator, term, *proximity)
            }
        }
    }

    fn translate_condition(
        &self,
        field: &str,
        operator: &str,
        term: &str,
        proximity: Option<u32>,
    ) -> Result<String> {
        let search_field = self.catalog.resolve(field)?;
        let operator = Operator::parse(operator)?;

        let engine_fields = match operator {
            Operator::MatchesPattern => &search_field.string_fields,
            _ => &search_field.text_fields,
        };
        if engine_fields.is_empty() {
            return Err(QuerierError::unsupported_operator(
                &search_field.name,
                operator.label(),
            ));
        }

        let term = build_term(operator, term, proximity);
        let clauses: Vec<String> = engine_fields
            .iter()
            .map(|engine_field| format!("{engine_field}:({term})"))
            .collect();

        Ok(format!("({})", clauses.join(" OR ")))
    }
}

/// Build the operator-specific term expression.
pub fn build_term(operator: Operator, term: &str, proximity: Option<u32>) -> String {
    match operator {
        Operator::ContainsAnyWord => escape(term),
        Operator::ContainsAllWords => {
            let escaped = escape(term);
            match proximity {
                Some(distance) => format!("+\"{escaped}\" ~{distance}"),
                None => escaped
                    .split_whitespace()
                    .map(|word| format!("+{word}"))
                    .collect::<Vec<_>>()
                    .join(" "),
            }
        }
        Operator::ContainsExpression => format!("\"{}\"", escape(term)),
        Operator::MatchesPattern => format!("/{}/", wildcard_to_regex(term)),
    }
}

/// Convert `*`/`?` wildcards to a regex body, escaping everything else.
fn wildcard_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() * 2);
    let mut segment_start = 0;
    for (i, c) in pattern.char_indices() {
        let replacement = match c {
            '*' => ".*",
            '?' => ".",
            _ => continue,
        };
        regex.push_str(&escape_pattern(&pattern[segment_start..i]));
        regex.push_str(replacement);
        segment_start = i + c.len_utf8();
    }
    regex.push_str(&escape_pattern(&pattern[segment_start..]));
    regex
}
