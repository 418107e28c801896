//! Error types for gql-pager
//!
//! Every fallible public API returns `Result<T, Error>`. Apart from
//! [`Error::Conversion`], which the typed collector logs and swallows per item,
//! each variant aborts the pagination call it was raised in.

use crate::jsonpath::KeyPath;
use reqwest::header::HeaderMap;
use thiserror::Error;

/// The main error type for gql-pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// The request could not be sent
    #[error("error exec http request with url=[{url}] and payload=[{payload}]: {source}")]
    Transport {
        /// Endpoint
        url: String,
        /// Rendered payload
        payload: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status other than 200
    #[error("bad http response from url=[{url}] and payload=[{payload}]; status=[{status}], response=[{body}]")]
    HttpStatus {
        /// Endpoint
        url: String,
        /// Rendered payload
        payload: String,
        /// Response status code
        status: u16,
        /// Response headers
        headers: HeaderMap,
        /// Response body, empty when unreadable
        body: String,
    },

    /// The response body could not be read
    #[error("error reading the response from url=[{url}] and payload=[{payload}]: {source}")]
    BodyRead {
        /// Endpoint
        url: String,
        /// Rendered payload
        payload: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint is not a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Response Errors
    // ============================================================================
    /// The body is not a JSON object
    #[error("cannot parse response: {message}; body=[{body}]")]
    Parse {
        /// Parser message
        message: String,
        /// Raw body, lossily decoded
        body: String,
    },

    /// The response carried GraphQL errors and no results
    #[error("error exec http request with url=[{url}] and payload=[{payload}]. The error is [{message}]")]
    GraphQl {
        /// Endpoint
        url: String,
        /// Rendered payload
        payload: String,
        /// Every error message, each followed by `.`
        message: String,
    },

    /// A total or count key-path did not resolve
    #[error("cannot get the {field} from [{path}]")]
    MissingField {
        /// `total` or `count`
        field: String,
        /// Key-path that was looked up
        path: KeyPath,
    },

    /// A total or count resolved to something other than a number
    #[error("the {field} at [{path}] is not a number: {value}")]
    InvalidNumber {
        /// `total` or `count`
        field: String,
        /// Key-path that was looked up
        path: KeyPath,
        /// The value found, as JSON text
        value: String,
    },

    /// A reported count pushed the offset past the `i64` range
    #[error("the count {count} at [{path}] overflows the offset {offset}")]
    CountOverflow {
        /// Key-path of the count
        path: KeyPath,
        /// Offset before the count was applied
        offset: i64,
        /// The reported count
        count: i64,
    },

    // ============================================================================
    // Caller Errors
    // ============================================================================
    /// The page callback failed
    #[error(transparent)]
    Callback(anyhow::Error),

    /// A result item did not decode into the target type
    #[error("cannot convert result item: {0}")]
    Conversion(#[source] serde_json::Error),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid or missing configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// YAML parse error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parse or write error
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Any other error, usually with added context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a parse error carrying the raw body for diagnostics
    pub fn parse(message: impl Into<String>, body: &[u8]) -> Self {
        Self::Parse {
            message: message.into(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Create a missing field error for a key-path that did not resolve
    pub fn missing_field(field: impl Into<String>, path: &KeyPath) -> Self {
        Self::MissingField {
            field: field.into(),
            path: path.clone(),
        }
    }

    /// HTTP status of the response, if this error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Transport { source, .. } | Error::BodyRead { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            _ => None,
        }
    }

    /// Check if the error came from the caller's page callback
    pub fn is_callback(&self) -> bool {
        matches!(self, Error::Callback(_))
    }
}

/// Result type alias for gql-pager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
