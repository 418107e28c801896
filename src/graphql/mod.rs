//! GraphQL pagination module
//!
//! Drives offset-based pagination over a templated GraphQL query.
//!
//! # Overview
//!
//! Each iteration renders the query template with the current offset, POSTs
//! it to the endpoint, pulls the result array plus `total`/`count` out of the
//! response at caller-supplied key-paths and hands the page to a callback.
//! The loop ends when `total` records were fetched or the request's `max` cap
//! was reached. There is no retry: any failure ends the whole call.

mod client;
mod decode;
mod paginate;
mod request;

pub use client::{basic_auth, bearer_auth, GraphqlClient, GraphqlClientBuilder};
pub use decode::{decode, fetch_all};
pub use paginate::{Page, PaginationState};
pub use request::{PaginationRequest, PaginationRequestBuilder};

#[cfg(test)]
mod tests;
