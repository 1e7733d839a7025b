//! Command implementations for the querier CLI.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::FieldCatalog;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{NodeConfig, NodeRegistry};
use crate::error::{QuerierError, Result};
use crate::query::{AbstractQuery, FilterSet};
use crate::response::NativeResponse;
use crate::search::{Normalizer, Querier, StatBoundsMap};
use crate::transform::{IndexValue, TransformationOptions, TransformationRegistry, TransformationSpec};
use crate::transport::{RecordingTransport, Transport};

/// Execute a CLI command.
pub fn execute_command(args: QuerierArgs) -> Result<()> {
    match &args.command {
        Command::Build(build_args) => build_request(build_args, &args),
        Command::Normalize(normalize_args) => normalize_response(normalize_args, &args),
        Command::Query(query_args) => run_query(query_args, &args),
        Command::Transform(transform_args) => transform_values(transform_args, &args),
    }
}

/// Print the Solr parameters of a query.
fn build_request(args: &BuildArgs, cli_args: &QuerierArgs) -> Result<()> {
    let (registry, node) = load_node(&args.node)?;
    let (query, filters) = load_input(&args.input)?;

    // Nothing is sent, so the querier gets a transport with no responses.
    let querier = querier(registry, node.id, Arc::new(RecordingTransport::new()));
    let built = querier.build(&query, &filters)?;
    info!(
        "Built request for node {} ({} filter clauses)",
        node.name,
        built.request.filters.len()
    );

    let mut requests = vec![RequestParams {
        stat_field: None,
        params: built.request.to_params(),
    }];
    if args.bounds && built.date_range_active {
        for field in &built.request.stats_fields {
            requests.push(RequestParams {
                stat_field: Some(field.clone()),
                params: built.request.without_date_ranges(field).to_params(),
            });
        }
    }

    output_build(
        &BuildResult {
            node: node.name.clone(),
            date_range_active: built.date_range_active,
            requests,
        },
        cli_args,
    )
}

/// Normalize a saved Solr response.
fn normalize_response(args: &NormalizeArgs, cli_args: &QuerierArgs) -> Result<()> {
    let (_, node) = load_node(&args.node)?;
    let content = read_file(&args.response_file)?;
    let response: NativeResponse = serde_json::from_str(&content)?;

    let catalog = FieldCatalog::new(node.search_fields.clone());
    let normalized = Normalizer::new(&catalog, &node.settings.resource_name_field)
        .normalize(&response, &StatBoundsMap::new());

    output_response(&normalized, cli_args)
}

/// Execute a query through the HTTP transport.
#[cfg(feature = "http")]
fn run_query(args: &QueryArgs, cli_args: &QuerierArgs) -> Result<()> {
    use crate::transport::HttpTransport;

    let (registry, node) = load_node(&args.node)?;
    let (query, filters) = load_input(&args.input)?;

    let transport = HttpTransport::new(&node.settings.client)?;
    info!("Querying {}", transport.url());

    let response = querier(registry, node.id, Arc::new(transport)).query(&query, &filters)?;
    output_response(&response, cli_args)
}

#[cfg(not(feature = "http"))]
fn run_query(_args: &QueryArgs, _cli_args: &QuerierArgs) -> Result<()> {
    Err(QuerierError::config(
        "the query command requires the `http` feature",
    ))
}

/// Apply a chain of transformations to the given values.
fn transform_values(args: &TransformArgs, cli_args: &QuerierArgs) -> Result<()> {
    let options: TransformationOptions = match &args.options {
        Some(json) => serde_json::from_str(json)?,
        None => TransformationOptions::new(),
    };
    let specs: Vec<TransformationSpec> = args
        .transformations
        .iter()
        .map(|name| TransformationSpec {
            name: name.clone(),
            options: options.clone(),
        })
        .collect();

    let values = args.values.iter().map(IndexValue::new).collect();
    let transformed = TransformationRegistry::with_defaults().apply_all(&specs, values)?;

    output_result(
        &format!("Applied {} transformation(s)", specs.len()),
        &TransformResult {
            transformations: args.transformations.clone(),
            values: transformed.into_iter().map(|v| v.value).collect(),
        },
        cli_args,
    )
}

fn querier(registry: Arc<NodeRegistry>, node_id: u64, transport: Arc<dyn Transport>) -> Querier {
    Querier::new(registry.clone(), registry, transport).with_node(node_id)
}

/// Load the registry and resolve the selected node.
fn load_node(args: &NodeArgs) -> Result<(Arc<NodeRegistry>, NodeConfig)> {
    debug!("Loading node registry from {}", args.config.display());
    let registry = NodeRegistry::from_file(&args.config)?;
    let node = registry
        .find(&args.node)
        .cloned()
        .ok_or_else(|| QuerierError::unconfigured(format!("search node {} does not exist", args.node)))?;
    Ok((Arc::new(registry), node))
}

/// Load the abstract query and the filter set.
///
/// Without a query the search matches everything. Input that is not JSON is
/// taken as free text.
fn load_input(args: &QueryInputArgs) -> Result<(AbstractQuery, FilterSet)> {
    let raw_query = match (&args.query, &args.query_file) {
        (Some(query), _) => Some(query.clone()),
        (None, Some(path)) => Some(read_file(path)?),
        (None, None) => None,
    };
    let query = match raw_query {
        Some(raw) => parse_query(&raw)?,
        None => AbstractQuery::default(),
    };

    let mut filters: FilterSet = match &args.filters {
        Some(path) => serde_json::from_str(&read_file(path)?)?,
        None => FilterSet::default(),
    };
    if !args.resources.is_empty() {
        filters.resources = args.resources.clone();
    }

    Ok((query, filters))
}

/// Parse a query given on the command line or in a file.
///
/// Input that is not a JSON string, object or array becomes free text. A JSON
/// object or array of the wrong shape is an error.
fn parse_query(raw: &str) -> Result<AbstractQuery> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::String(_) | Value::Object(_) | Value::Array(_))) => {
            Ok(AbstractQuery::deserialize(value)?)
        }
        _ => Ok(AbstractQuery::text(raw.trim())),
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        QuerierError::config(format!("cannot read {}: {e}", path.display()))
    })
}
