//! Pagination driver
//!
//! Each iteration moves through: fetch → (results | GraphQL errors | empty page)
//! → advance → continue or stop. The state is owned by a single call and
//! dropped when it returns.

use super::client::GraphqlClient;
use super::request::PaginationRequest;
use crate::error::{Error, Result};
use crate::jsonpath::{get_array, get_value, KeyPath};
use crate::template::{render_payload, unresolved_placeholders};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Progress of one pagination call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Records requested so far, including the starting offset
    pub offset: i64,
    /// Records retrieved by this call
    pub fetched: i64,
    /// Total last reported by the server
    pub total: i64,
    /// HTTP calls made
    pub pages: u32,
}

impl PaginationState {
    /// Create state for a call starting at `offset`
    pub fn starting_at(offset: i64) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    /// Apply one page's server-reported total and count
    ///
    /// Returns `false` and leaves the state untouched when `count` would
    /// overflow the offset or the fetched tally.
    pub fn advance(&mut self, total: i64, count: i64) -> bool {
        let (Some(offset), Some(fetched)) = (
            self.offset.checked_add(count),
            self.fetched.checked_add(count),
        ) else {
            return false;
        };
        self.total = total;
        self.offset = offset;
        self.fetched = fetched;
        true
    }

    /// Check if every record the server reported has been fetched
    pub fn is_complete(&self) -> bool {
        self.fetched >= self.total
    }
}

/// One page of results handed to the caller
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    offset: i64,
    results: &'a [Value],
    total: Option<i64>,
    count: Option<i64>,
}

impl<'a> Page<'a> {
    /// Offset this page was requested with
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// The result objects, in server order
    pub fn results(&self) -> &'a [Value] {
        self.results
    }

    /// Number of results on this page
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the page carries no results
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Total reported with this page, if it resolved to a number
    pub fn total(&self) -> Option<i64> {
        self.total
    }

    /// Count reported with this page, if it resolved to a number
    pub fn count(&self) -> Option<i64> {
        self.count
    }
}

impl GraphqlClient {
    /// Fetch every page of `request`, passing each non-empty page to `on_page`
    ///
    /// Stops once the server-reported total is reached or the request's `max`
    /// cap is crossed. An error from `on_page` ends the call immediately and is
    /// returned as [`Error::Callback`].
    pub async fn paginate<F>(
        &self,
        request: &PaginationRequest,
        mut on_page: F,
    ) -> Result<PaginationState>
    where
        F: FnMut(&Page<'_>) -> anyhow::Result<()>,
    {
        let mut state = PaginationState::starting_at(request.start_offset());

        loop {
            info!("running for offset {}", state.offset);

            let payload = render_payload(&request.graphql, &request.vars(state.offset));
            let leftover = unresolved_placeholders(&payload);
            if !leftover.is_empty() {
                debug!("unresolved placeholders in payload: {:?}", leftover);
            }

            let body = self.execute(&payload).await?;
            state.pages += 1;

            let doc = parse_document(&body)?;
            let (total, count) =
                self.handle_page(request, &doc, &payload, state.offset, &mut on_page)?;
            if !state.advance(total, count) {
                return Err(Error::CountOverflow {
                    path: request.count_keys.clone(),
                    offset: state.offset,
                    count,
                });
            }

            if state.is_complete() {
                break;
            }

            if let Some(max) = request.max_records() {
                if state.fetched >= max {
                    info!(
                        "exiting the pagination since the results [{}] crossed a max of [{}]. The total is [{}]",
                        state.fetched, max, state.total
                    );
                    break;
                }
            }

            if let Some(max_pages) = request.max_pages {
                if state.pages >= max_pages {
                    warn!(
                        "stopping after {} pages with {} of {} results fetched",
                        state.pages, state.fetched, state.total
                    );
                    break;
                }
            }
        }

        info!(
            "completed the iteration, received {} of {} results",
            state.fetched, state.total
        );
        Ok(state)
    }

    /// Dispatch one parsed response and return its `(total, count)`
    fn handle_page<F>(
        &self,
        request: &PaginationRequest,
        doc: &Value,
        payload: &str,
        offset: i64,
        on_page: &mut F,
    ) -> Result<(i64, i64)>
    where
        F: FnMut(&Page<'_>) -> anyhow::Result<()>,
    {
        let total = read_number(doc, &request.total_keys, "total");
        let count = read_number(doc, &request.count_keys, "count");

        match get_array(doc, &request.result_keys) {
            Some(results) if !results.is_empty() => {
                let page = Page {
                    offset,
                    results,
                    total: total.as_ref().ok().copied(),
                    count: count.as_ref().ok().copied(),
                };
                on_page(&page).map_err(Error::Callback)?;
            }
            _ => {
                if let Some(message) = graphql_errors(doc) {
                    return Err(Error::GraphQl {
                        url: self.url().to_string(),
                        payload: payload.to_string(),
                        message,
                    });
                }
                warn!("the results are null for {}", payload);
            }
        }

        Ok((total?, count?))
    }
}

/// Parse a response body whose root must be a JSON object
fn parse_document(body: &[u8]) -> Result<Value> {
    let doc: Value =
        serde_json::from_slice(body).map_err(|e| Error::parse(e.to_string(), body))?;
    if !doc.is_object() {
        return Err(Error::parse("response root is not a JSON object", body));
    }
    Ok(doc)
}

/// Read a numeric field, truncating fractional values
fn read_number(doc: &Value, path: &KeyPath, field: &str) -> Result<i64> {
    let value = get_value(doc, path).ok_or_else(|| Error::missing_field(field, path))?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .ok_or_else(|| Error::InvalidNumber {
            field: field.to_string(),
            path: path.clone(),
            value: value.to_string(),
        })
}

/// Concatenated `message` fields of a non-empty top-level `errors` array
fn graphql_errors(doc: &Value) -> Option<String> {
    let errors = doc.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }

    let message = errors
        .iter()
        .map(|e| {
            let msg = e.get("message").and_then(Value::as_str).unwrap_or_default();
            format!("{msg}.")
        })
        .collect();
    Some(message)
}
