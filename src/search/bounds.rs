//! Date-range bounds resolution.
//!
//! When a date-range filter narrows the results, the stats Solr returns only
//! cover the filtered population. A slider needs the full extent as well, so
//! each stat field gets one compensating request with the date-range clauses
//! removed.

use std::collections::BTreeMap;

use log::debug;
use serde_json::Value;

use crate::error::Result;
use crate::query::builder::BuiltQuery;
use crate::response::NativeResponse;
use crate::transport::Transport;

/// Min and max of a field over the date-unfiltered population.
#[derive(Debug, Clone, PartialEq)]
pub struct StatBounds {
    pub min: Value,
    pub max: Value,
}

/// Bounds per stat field.
pub type StatBoundsMap = BTreeMap<String, StatBounds>;

/// Issues the compensating requests.
pub struct BoundsResolver<'a> {
    transport: &'a dyn Transport,
}

impl<'a> BoundsResolver<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        BoundsResolver { transport }
    }

    /// Resolve bounds for every stat field of `primary`.
    ///
    /// Nothing is sent unless the built query carries a date-range clause.
    /// Requests run one after the other, after the primary one; the first
    /// failure aborts resolution.
    pub fn resolve(&self, built: &BuiltQuery, primary: &NativeResponse) -> Result<StatBoundsMap> {
        let mut bounds = StatBoundsMap::new();
        if !built.date_range_active {
            return Ok(bounds);
        }
        let Some(stats) = &primary.stats else {
            return Ok(bounds);
        };

        // Fields without stats in the primary response are never reported.
        let fields = stats
            .stats_fields
            .iter()
            .filter(|(_, field_stats)| field_stats.is_some())
            .map(|(field, _)| field);

        for field in fields {
            let request = built.request.without_date_ranges(field);
            debug!("Solr query params: {}", request.to_query_string());
            let response = self.transport.execute(&request)?;

            if let Some(field_stats) = response.field_stats(field) {
                bounds.insert(
                    field.clone(),
                    StatBounds {
                        min: field_stats.min.clone(),
                        max: field_stats.max.clone(),
                    },
                );
            }
        }

        Ok(bounds)
    }
}
