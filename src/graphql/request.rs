//! Pagination request definition
//!
//! A request is immutable per call: the query template, where to find the
//! results/total/count in each response, and the paging limits.

use crate::error::Result;
use crate::jsonpath::KeyPath;
use crate::template::QueryVars;
use crate::time::time_range_last;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration of one pagination call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationRequest {
    /// Key-path of the result array
    pub result_keys: KeyPath,
    /// Key-path of the server-reported total
    pub total_keys: KeyPath,
    /// Key-path of the per-page record count
    pub count_keys: KeyPath,
    /// Query template with `${...}` placeholders
    pub graphql: String,
    /// Page size hint for `${LIMIT}`; `<= 0` means unspecified
    #[serde(default)]
    pub limit: i64,
    /// Cap on records fetched; `<= 0` means unbounded
    #[serde(default)]
    pub max: i64,
    /// Value for `${START_TIME}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Value for `${END_TIME}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Stop after this many HTTP calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
    #[serde(skip)]
    pub(crate) offset: i64,
}

impl PaginationRequest {
    /// Start building a request for a query template
    pub fn builder(graphql: impl Into<String>) -> PaginationRequestBuilder {
        PaginationRequestBuilder::new(graphql)
    }

    /// Load a request from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a request from YAML (JSON is accepted too)
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Offset of the first page
    pub fn start_offset(&self) -> i64 {
        self.offset
    }

    /// Set the offset of the first page
    pub fn set_start_offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    /// The `max` cap, if one is configured
    pub fn max_records(&self) -> Option<i64> {
        (self.max > 0).then_some(self.max)
    }

    /// Set both time window bounds to the span ending now
    pub fn set_last(&mut self, duration: Duration) {
        let (start, end) = time_range_last(duration);
        self.start_time = Some(start);
        self.end_time = Some(end);
    }

    /// Template values for a page starting at `offset`
    pub(crate) fn vars(&self, offset: i64) -> QueryVars {
        QueryVars::new(offset)
            .limit(self.limit)
            .window(self.start_time.clone(), self.end_time.clone())
    }
}

/// Builder for [`PaginationRequest`]
#[derive(Debug, Clone)]
pub struct PaginationRequestBuilder {
    request: PaginationRequest,
}

impl PaginationRequestBuilder {
    fn new(graphql: impl Into<String>) -> Self {
        Self {
            request: PaginationRequest {
                graphql: graphql.into(),
                ..Default::default()
            },
        }
    }

    /// Set the key-path of the result array
    #[must_use]
    pub fn result_keys(mut self, keys: impl Into<KeyPath>) -> Self {
        self.request.result_keys = keys.into();
        self
    }

    /// Set the key-path of the total
    #[must_use]
    pub fn total_keys(mut self, keys: impl Into<KeyPath>) -> Self {
        self.request.total_keys = keys.into();
        self
    }

    /// Set the key-path of the page count
    #[must_use]
    pub fn count_keys(mut self, keys: impl Into<KeyPath>) -> Self {
        self.request.count_keys = keys.into();
        self
    }

    /// Set the page size substituted for `${LIMIT}`
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.request.limit = limit;
        self
    }

    /// Stop once this many records were fetched
    #[must_use]
    pub fn max(mut self, max: i64) -> Self {
        self.request.max = max;
        self
    }

    /// Stop after this many HTTP calls
    #[must_use]
    pub fn max_pages(mut self, pages: u32) -> Self {
        self.request.max_pages = Some(pages);
        self
    }

    /// Set an explicit time window
    #[must_use]
    pub fn window(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.request.start_time = Some(start.into());
        self.request.end_time = Some(end.into());
        self
    }

    /// Set the time window to the span ending now
    #[must_use]
    pub fn last(mut self, duration: Duration) -> Self {
        self.request.set_last(duration);
        self
    }

    /// Start paginating from this offset instead of 0
    #[must_use]
    pub fn start_offset(mut self, offset: i64) -> Self {
        self.request.offset = offset;
        self
    }

    /// Build the request
    pub fn build(self) -> PaginationRequest {
        self.request
    }
}
