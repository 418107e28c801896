//! # gql-pager
//!
//! Offset-based pagination over templated GraphQL queries.
//!
//! ## Features
//!
//! - **Templated queries**: `${OFFSET}`, `${LIMIT}`, `${START_TIME}` and `${END_TIME}`
//!   are substituted into the query on every page
//! - **Key-path extraction**: results, total and count are located by plain lists of keys
//! - **Typed collection**: results decode into any `serde` type; bad items are skipped
//! - **Small utilities**: local YAML config, filesystem probes, CSV rows, multimaps
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gql_pager::graphql::{GraphqlClient, PaginationRequest};
//!
//! #[derive(serde::Deserialize)]
//! struct Item {
//!     id: i64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> gql_pager::Result<()> {
//!     let client = GraphqlClient::builder("https://api.example.com/graphql")
//!         .bearer("token")
//!         .build()?;
//!
//!     let request = PaginationRequest::builder(
//!         "{ items(offset: ${OFFSET}, limit: ${LIMIT}) { results { id } total count } }",
//!     )
//!     .result_keys(["data", "items", "results"])
//!     .total_keys(["data", "items", "total"])
//!     .count_keys(["data", "items", "count"])
//!     .limit(100)
//!     .build();
//!
//!     let items: Vec<Item> = client.fetch_all(&request).await?;
//!     println!("{} items", items.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Flow
//!
//! ```text
//!  render payload ──▶ POST ──▶ parse ──▶ extract results/total/count
//!        ▲                                         │
//!        │                                         ▼
//!  advance offset ◀──── total/max reached? ◀── callback(page)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Key-path navigation over JSON documents
pub mod jsonpath;

/// Query template rendering
pub mod template;

/// Time window helpers
pub mod time;

/// GraphQL client and pagination driver
pub mod graphql;

/// Local YAML configuration
pub mod config;

/// Filesystem probes
pub mod fs;

/// Delimited row files
pub mod rows;

/// Multi-valued maps
pub mod multimap;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use graphql::{fetch_all, GraphqlClient, Page, PaginationRequest, PaginationState};
pub use jsonpath::KeyPath;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
