//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Paginated GraphQL fetcher
#[derive(Parser, Debug)]
#[command(name = "gql-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every page of a request
    Fetch(FetchArgs),

    /// Print the payload sent for one page
    Render {
        /// Request file and overrides
        #[command(flatten)]
        request: RequestArgs,

        /// Offset to render
        #[arg(long, default_value = "0")]
        offset: i64,
    },
}

/// Request file and overrides
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Request definition file (YAML or JSON)
    pub request: PathBuf,

    /// Page size for ${LIMIT}
    #[arg(long)]
    pub limit: Option<i64>,

    /// Stop once this many records were fetched
    #[arg(long)]
    pub max: Option<i64>,

    /// Stop after this many HTTP calls
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Query the window ending now and spanning this many minutes
    #[arg(long, conflicts_with_all = ["start_time", "end_time"])]
    pub last_minutes: Option<u64>,

    /// Value for ${START_TIME}
    #[arg(long)]
    pub start_time: Option<String>,

    /// Value for ${END_TIME}
    #[arg(long)]
    pub end_time: Option<String>,
}

/// Arguments of `fetch`
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Request file and overrides
    #[command(flatten)]
    pub request: RequestArgs,

    /// GraphQL endpoint (default: `gql_url` from the local config)
    #[arg(short, long, env = "GQL_URL")]
    pub url: Option<String>,

    /// Authorization header value (default: `gql_authorization` from the local config)
    #[arg(short, long, env = "GQL_AUTHORIZATION", hide_env_values = true)]
    pub authorization: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,

    /// Columns for CSV output (comma-separated top-level fields)
    #[arg(long, value_delimiter = ',', required_if_eq("format", "csv"))]
    pub columns: Vec<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per line
    Json,
    /// CSV with a header row
    Csv,
}
