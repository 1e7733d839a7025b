//! Date transformations.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{IndexValue, Transformation, TransformationOptions};

static FULL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[1-2][0-9]|3[0-1])$")
        .expect("full date pattern is valid")
});
static YEAR_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])$").expect("year-month pattern is valid")
});
static YEAR_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s*[-/]\s*(\d+)\s*$").expect("year span pattern is valid")
});
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*$").expect("number pattern is valid"));

/// A value as recognized by the date transformations.
#[derive(Debug, PartialEq, Eq)]
enum DateShape<'a> {
    /// `YYYY-MM-DD` or `YYYY-MM`.
    Calendar,
    /// Two numbers separated by `-` or `/`.
    Span(&'a str, &'a str),
    Number,
    Other,
}

fn shape(value: &str) -> DateShape<'_> {
    if FULL_DATE.is_match(value) || YEAR_MONTH.is_match(value) {
        DateShape::Calendar
    } else if let Some(caps) = YEAR_SPAN.captures(value) {
        match (caps.get(1), caps.get(2)) {
            (Some(start), Some(end)) => DateShape::Span(start.as_str(), end.as_str()),
            _ => DateShape::Other,
        }
    } else if NUMBER.is_match(value) {
        DateShape::Number
    } else {
        DateShape::Other
    }
}

/// Numeric comparison of two digit strings of any length.
fn ordered(start: &str, end: &str) -> bool {
    let start = start.trim_start_matches('0');
    let end = end.trim_start_matches('0');
    (start.len(), start) <= (end.len(), end)
}

/// Reduces dates to their year.
///
/// Calendar dates keep their first four characters, spans yield both ends and
/// bare numbers are kept. An inverted span empties the whole result.
#[derive(Clone, Debug, Default)]
pub struct DateYearTransformation;

impl Transformation for DateYearTransformation {
    fn transform(&self, values: Vec<IndexValue>, _options: &TransformationOptions) -> Vec<IndexValue> {
        let mut transformed = Vec::with_capacity(values.len());
        for value in values {
            match shape(&value.value) {
                DateShape::Calendar => transformed.push(IndexValue::new(&value.value[..4])),
                DateShape::Span(start, end) => {
                    if !ordered(start, end) {
                        return Vec::new();
                    }
                    transformed.push(IndexValue::new(start));
                    transformed.push(IndexValue::new(end));
                }
                DateShape::Number => transformed.push(value.clone()),
                DateShape::Other => {}
            }
        }
        transformed
    }

    fn name(&self) -> &'static str {
        "date_year"
    }

    fn label(&self) -> &'static str {
        "Convert Date to just the Year"
    }
}

/// Converts values to Solr date range syntax.
///
/// Calendar dates and bare numbers pass through, spans become
/// `[start TO end]`. Anything else, inverted spans included, is dropped
/// unless the `exclude_unmatching` option is false.
#[derive(Clone, Debug, Default)]
pub struct DateRangeTransformation;

impl DateRangeTransformation {
    fn exclude_unmatching(options: &TransformationOptions) -> bool {
        match options.get("exclude_unmatching") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s != "0" && !s.is_empty(),
            Some(Value::Number(n)) => n.as_u64() != Some(0),
            _ => true,
        }
    }
}

impl Transformation for DateRangeTransformation {
    fn transform(&self, values: Vec<IndexValue>, options: &TransformationOptions) -> Vec<IndexValue> {
        let exclude_unmatching = Self::exclude_unmatching(options);
        let mut transformed = Vec::with_capacity(values.len());
        for value in values {
            let converted = match shape(&value.value) {
                DateShape::Calendar | DateShape::Number => Some(value.value.clone()),
                DateShape::Span(start, end) if ordered(start, end) => {
                    Some(format!("[{start} TO {end}]"))
                }
                _ => None,
            };
            match converted {
                Some(converted) => transformed.push(IndexValue::new(converted)),
                None if !exclude_unmatching => transformed.push(value),
                None => {}
            }
        }
        transformed
    }

    fn name(&self) -> &'static str {
        "date_range"
    }

    fn label(&self) -> &'static str {
        "Convert to Solr date range"
    }
}
