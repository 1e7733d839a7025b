//! Command line argument parsing for the querier CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// solr-querier - Translate abstract queries into Solr requests
#[derive(Parser, Debug, Clone)]
#[command(name = "solr-querier")]
#[command(about = "Translate abstract search queries into Solr requests and normalize the results")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct QuerierArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl QuerierArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the Solr parameters of a query without sending it
    Build(BuildArgs),

    /// Normalize a saved Solr response
    Normalize(NormalizeArgs),

    /// Execute a query against the node's Solr core
    Query(QueryArgs),

    /// Apply value transformations to a list of values
    Transform(TransformArgs),
}

/// Node selection shared by the commands that need a catalog.
#[derive(clap::Args, Debug, Clone)]
pub struct NodeArgs {
    /// Node registry file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: PathBuf,

    /// Node id or name
    #[arg(short, long, value_name = "NODE")]
    pub node: String,
}

/// Query and filters shared by `build` and `query`.
#[derive(clap::Args, Debug, Clone)]
pub struct QueryInputArgs {
    /// Abstract query as inline JSON; a bare string is free text
    #[arg(long, value_name = "JSON", conflicts_with = "query_file")]
    pub query: Option<String>,

    /// File holding the abstract query (JSON)
    #[arg(long, value_name = "QUERY_FILE")]
    pub query_file: Option<PathBuf>,

    /// File holding the filter set (JSON)
    #[arg(long, value_name = "FILTERS_FILE")]
    pub filters: Option<PathBuf>,

    /// Resource types to search, overriding the filter set's
    #[arg(short, long, value_delimiter = ',')]
    pub resources: Vec<String>,
}

/// Arguments for building a request
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub node: NodeArgs,

    #[command(flatten)]
    pub input: QueryInputArgs,

    /// Also print the compensating bounds requests
    #[arg(long)]
    pub bounds: bool,
}

/// Arguments for normalizing a response
#[derive(Parser, Debug, Clone)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub node: NodeArgs,

    /// Saved Solr response (JSON)
    #[arg(value_name = "RESPONSE_FILE")]
    pub response_file: PathBuf,
}

/// Arguments for executing a query
#[derive(Parser, Debug, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub node: NodeArgs,

    #[command(flatten)]
    pub input: QueryInputArgs,
}

/// Arguments for applying transformations
#[derive(Parser, Debug, Clone)]
pub struct TransformArgs {
    /// Transformation names, applied in order
    #[arg(short = 't', long = "transformation", required = true)]
    pub transformations: Vec<String>,

    /// Transformation options as a JSON object, shared by every transformation
    #[arg(long, value_name = "JSON")]
    pub options: Option<String>,

    /// Values to transform
    #[arg(value_name = "VALUES", required = true)]
    pub values: Vec<String>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
