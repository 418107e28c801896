//! Query template rendering
//!
//! Wraps a GraphQL query template in the request envelope
//! `{"query": <template>, "variables": {}}` and substitutes the pagination
//! placeholders `${OFFSET}`, `${LIMIT}`, `${START_TIME}` and `${END_TIME}`.
//!
//! Substitution is a literal text replacement on the encoded envelope. Tokens
//! with no configured value are left in place.

use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Record offset of the page
pub const OFFSET: &str = "${OFFSET}";
/// Page size
pub const LIMIT: &str = "${LIMIT}";
/// Start of the time window
pub const START_TIME: &str = "${START_TIME}";
/// End of the time window
pub const END_TIME: &str = "${END_TIME}";

/// Matches any `${NAME}` token
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Values substituted into a query template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryVars {
    /// Always substituted
    pub offset: i64,
    /// Substituted only when positive
    pub limit: i64,
    /// Substituted only when non-empty
    pub start_time: Option<String>,
    /// Substituted only when non-empty
    pub end_time: Option<String>,
}

impl QueryVars {
    /// Create vars for an offset with nothing else set
    pub fn new(offset: i64) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    /// Set the page size
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Set the time window
    #[must_use]
    pub fn window(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    /// Placeholder/value pairs that take part in substitution
    fn substitutions(&self) -> Vec<(&'static str, String)> {
        let mut subs = vec![(OFFSET, self.offset.to_string())];
        if self.limit > 0 {
            subs.push((LIMIT, self.limit.to_string()));
        }
        if let Some(start) = self.start_time.as_deref().filter(|s| !s.is_empty()) {
            subs.push((START_TIME, start.to_string()));
        }
        if let Some(end) = self.end_time.as_deref().filter(|s| !s.is_empty()) {
            subs.push((END_TIME, end.to_string()));
        }
        subs
    }
}

/// Wrap a query in the GraphQL request envelope
pub fn as_gql_payload(query: &str) -> String {
    json!({
        "query": query,
        "variables": {},
    })
    .to_string()
}

/// Render the request payload for one page
pub fn render_payload(template: &str, vars: &QueryVars) -> String {
    let mut payload = as_gql_payload(template);
    for (token, value) in vars.substitutions() {
        payload = payload.replace(token, &value);
    }
    payload
}

/// Names of `${NAME}` tokens still present in a rendered payload
pub fn unresolved_placeholders(payload: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(payload)
        .map(|cap| cap[1].to_string())
        .collect()
}
