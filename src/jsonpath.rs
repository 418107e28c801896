//! Key-path navigation over parsed JSON documents
//!
//! A [`KeyPath`] is an ordered list of object keys applied one after another
//! from the document root. Lookups never fail with an error: a missing key, a
//! non-object node along the way, or a terminal node of the wrong kind all
//! resolve to `None`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Ordered sequence of map keys locating a node in a JSON document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "KeyPathRepr", into = "Vec<String>")]
pub struct KeyPath(Vec<String>);

/// Accepts either `["data", "items"]` or `"data.items"` in config files
#[derive(Deserialize)]
#[serde(untagged)]
enum KeyPathRepr {
    Keys(Vec<String>),
    Dotted(String),
}

impl From<KeyPathRepr> for KeyPath {
    fn from(repr: KeyPathRepr) -> Self {
        match repr {
            KeyPathRepr::Keys(keys) => Self(keys),
            KeyPathRepr::Dotted(s) => s.parse().unwrap_or_default(),
        }
    }
}

impl From<KeyPath> for Vec<String> {
    fn from(path: KeyPath) -> Self {
        path.0
    }
}

impl KeyPath {
    /// Create a key-path from any sequence of keys
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// The keys in lookup order
    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// Check if the path has no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys in the path
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

impl From<&[&str]> for KeyPath {
    fn from(keys: &[&str]) -> Self {
        Self::new(keys.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(keys: [&str; N]) -> Self {
        Self::new(keys)
    }
}

impl FromStr for KeyPath {
    type Err = Infallible;

    /// Parse a dotted path such as `data.items.results`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.split('.').filter(|k| !k.is_empty())))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Walk `path` from `doc`; an empty path resolves to nothing
fn get_node<'a>(doc: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }

    let mut current = doc;
    for key in path.keys() {
        match current {
            Value::Object(map) => {
                current = map.get(key)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Fetch a scalar (string, number or bool) at `path`
///
/// Arrays, objects and `null` at the terminal position resolve to `None`.
pub fn get_value<'a>(doc: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    match get_node(doc, path)? {
        Value::Array(_) | Value::Object(_) | Value::Null => None,
        scalar => Some(scalar),
    }
}

/// Fetch an array at `path`
pub fn get_array<'a>(doc: &'a Value, path: &KeyPath) -> Option<&'a [Value]> {
    match get_node(doc, path)? {
        Value::Array(items) => Some(items.as_slice()),
        _ => None,
    }
}
