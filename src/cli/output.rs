//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::args::{OutputFormat, QuerierArgs};
use crate::error::Result;
use crate::response::NormalizedResponse;

/// One request rendered as Solr parameters.
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestParams {
    /// Stat field of a compensating bounds request, `None` for the primary one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat_field: Option<String>,
    pub params: Vec<(String, String)>,
}

/// Result structure for request building.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildResult {
    pub node: String,
    pub date_range_active: bool,
    pub requests: Vec<RequestParams>,
}

/// Result structure for value transformations.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransformResult {
    pub transformations: Vec<String>,
    pub values: Vec<String>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &QuerierArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            output_generic_human(&serde_json::to_value(result)?);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output built requests.
pub fn output_build(result: &BuildResult, args: &QuerierArgs) -> Result<()> {
    if args.output_format == OutputFormat::Json {
        return output_json(result, args);
    }

    for request in &result.requests {
        match &request.stat_field {
            None => println!("Request for node {}:", result.node),
            Some(field) => {
                println!();
                println!("Bounds request for {field}:");
            }
        }
        for (key, value) in &request.params {
            println!("  {key}={value}");
        }
    }
    Ok(())
}

/// Output a normalized response.
pub fn output_response(response: &NormalizedResponse, args: &QuerierArgs) -> Result<()> {
    if args.output_format == OutputFormat::Json {
        return output_json(response, args);
    }

    println!("Total results: {}", response.total_results);
    for (resource, results) in &response.per_resource_type {
        println!();
        println!("{resource} ({}):", results.total);
        for id in &results.ids {
            println!("  {id}");
        }
    }

    if !response.facets.is_empty() {
        println!();
        println!("Facets:");
        for (field, counts) in &response.facets {
            println!("{field}:");
            for facet in counts {
                println!("  {} ({})", facet.value, facet.count);
            }
        }
    }

    if !response.date_stats.is_empty() {
        println!();
        println!("Date stats:");
        for stat in &response.date_stats {
            println!(
                "  {}: {} - {} (overall {} - {})",
                stat.field,
                format_value(&stat.min),
                format_value(&stat.max),
                format_value(&stat.total_min),
                format_value(&stat.total_max)
            );
        }
    }

    if args.verbosity() > 1
        && let Some(highlighting) = &response.highlighting
    {
        println!();
        println!("Highlighting:");
        for (id, fields) in highlighting {
            for (field, fragments) in fields {
                println!("  {id} {field}: {}", fragments.join(" ... "));
            }
        }
    }
    Ok(())
}

fn output_generic_human(value: &Value) {
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                println!("{key}: {}", format_value(val));
            }
        }
        _ => println!("{}", format_value(value)),
    }
}

fn output_json<T: Serialize>(result: &T, args: &QuerierArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        Value::Object(_) => "[object]".to_string(),
        Value::Null => "null".to_string(),
    }
}
