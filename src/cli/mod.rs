//! CLI module
//!
//! Command-line interface for paginated GraphQL fetches.
//!
//! # Commands
//!
//! - `fetch` - Run a request and write every result
//! - `render` - Print the payload a request sends for an offset

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
