//! GraphQL client and single-request executor
//!
//! The client holds the endpoint, an optional `Authorization` header value and
//! the HTTP transport. It is immutable once built and can be shared between
//! pagination calls.

use crate::error::{Error, Result};
use base64::Engine as _;
use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a `Bearer` authorization value
pub fn bearer_auth(token: &str) -> String {
    format!("Bearer {token}")
}

/// Build a `Basic` authorization value
pub fn basic_auth(username: &str, password: &str) -> String {
    let credentials = format!("{username}:{password}");
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(credentials)
    )
}

/// GraphQL endpoint client
#[derive(Clone)]
pub struct GraphqlClient {
    http: Client,
    url: Url,
    authorization: Option<String>,
}

impl GraphqlClient {
    /// Create a client for `url` with default settings
    pub fn new(url: &str) -> Result<Self> {
        Self::builder(url).build()
    }

    /// Start building a client for `url`
    pub fn builder(url: impl Into<String>) -> GraphqlClientBuilder {
        GraphqlClientBuilder::new(url)
    }

    /// The endpoint every request is posted to
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Check if an authorization header is sent
    pub fn has_authorization(&self) -> bool {
        self.authorization.is_some()
    }

    /// POST one payload and return the raw response body
    ///
    /// Anything other than `200 OK` is an [`Error::HttpStatus`] carrying the
    /// status, headers and whatever body could be read.
    pub async fn execute(&self, payload: &str) -> Result<Bytes> {
        let mut req = self
            .http
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_string());

        if let Some(ref auth) = self.authorization {
            req = req.header(AUTHORIZATION, auth.as_str());
        }

        debug!("running the query \n{}", payload);

        let response = req.send().await.map_err(|source| Error::Transport {
            url: self.url.to_string(),
            payload: payload.to_string(),
            source,
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                url: self.url.to_string(),
                payload: payload.to_string(),
                status: status.as_u16(),
                headers,
                body,
            });
        }

        response.bytes().await.map_err(|source| Error::BodyRead {
            url: self.url.to_string(),
            payload: payload.to_string(),
            source,
        })
    }
}

impl std::fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("url", &self.url.as_str())
            .field("has_authorization", &self.authorization.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`GraphqlClient`]
#[derive(Debug)]
pub struct GraphqlClientBuilder {
    url: String,
    authorization: Option<String>,
    timeout: Duration,
    user_agent: String,
    client: Option<Client>,
}

impl GraphqlClientBuilder {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            authorization: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("gql-pager/{}", env!("CARGO_PKG_VERSION")),
            client: None,
        }
    }

    /// Send this `Authorization` header value verbatim; empty means none
    #[must_use]
    pub fn authorization(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.authorization = (!value.is_empty()).then_some(value);
        self
    }

    /// Authorize with a bearer token
    #[must_use]
    pub fn bearer(self, token: &str) -> Self {
        self.authorization(bearer_auth(token))
    }

    /// Authorize with basic credentials
    #[must_use]
    pub fn basic(self, username: &str, password: &str) -> Self {
        self.authorization(basic_auth(username, password))
    }

    /// Set the per-request timeout (ignored with an injected client)
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent (ignored with an injected client)
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Use an existing transport
    #[must_use]
    pub fn http_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<GraphqlClient> {
        let url = Url::parse(&self.url)?;

        let http = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout)
                .user_agent(&self.user_agent)
                .build()
                .map_err(|e| Error::config(format!("cannot build HTTP client: {e}")))?,
        };

        Ok(GraphqlClient {
            http,
            url,
            authorization: self.authorization,
        })
    }
}
