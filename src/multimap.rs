//! Multi-valued maps for grouping decoded results

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Map from a key to every value put under it, in insertion order
#[derive(Debug, Clone)]
pub struct ArrayMultiMap<K, V> {
    data: HashMap<K, Vec<V>>,
}

impl<K: Eq + Hash, V> Default for ArrayMultiMap<K, V> {
    fn default() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> ArrayMultiMap<K, V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`
    pub fn put(&mut self, key: K, value: V) {
        self.data.entry(key).or_default().push(value);
    }

    /// Values under `key`; empty when absent
    pub fn get(&self, key: &K) -> &[V] {
        self.data.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Remove the first value under `key` matching `eq`
    pub fn remove<F: Fn(&V) -> bool>(&mut self, key: &K, eq: F) {
        if let Some(values) = self.data.get_mut(key) {
            if let Some(pos) = values.iter().position(eq) {
                values.remove(pos);
            }
        }
    }

    /// Drop `key` and all its values
    pub fn remove_all(&mut self, key: &K) {
        self.data.remove(key);
    }

    /// Keys with at least one put, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.data.keys()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the map has no keys
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Map from a key to a set of unique string values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetMultimap {
    data: HashMap<String, HashSet<String>>,
}

impl SetMultimap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.entry(key.into()).or_default().insert(value.into());
    }

    /// Remove `value` from `key`, dropping the key once it has no values
    pub fn remove(&mut self, key: &str, value: &str) {
        if let Some(values) = self.data.get_mut(key) {
            values.remove(value);
            if values.is_empty() {
                self.data.remove(key);
            }
        }
    }

    /// Values under `key`, in no particular order
    pub fn values(&self, key: &str) -> Vec<String> {
        self.data
            .get(key)
            .map(|vals| vals.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Check if `value` is stored under `key`
    pub fn has(&self, key: &str, value: &str) -> bool {
        self.data.get(key).is_some_and(|vals| vals.contains(value))
    }

    /// Every key with its values
    pub fn all(&self) -> HashMap<String, Vec<String>> {
        self.data
            .iter()
            .map(|(k, vals)| (k.clone(), vals.iter().cloned().collect()))
            .collect()
    }
}

/// Index items by a derived key; items with an empty key are skipped and a
/// later item replaces an earlier one with the same key
pub fn str_array_to_map<T, F>(items: impl IntoIterator<Item = T>, key_fn: F) -> HashMap<String, T>
where
    F: Fn(&T) -> String,
{
    items
        .into_iter()
        .filter_map(|item| {
            let key = key_fn(&item);
            (!key.is_empty()).then_some((key, item))
        })
        .collect()
}

/// Group items by a derived key; items with an empty key are skipped
pub fn str_array_to_multi_map<T, F>(
    items: impl IntoIterator<Item = T>,
    key_fn: F,
) -> ArrayMultiMap<String, T>
where
    F: Fn(&T) -> String,
{
    let mut map = ArrayMultiMap::new();
    for item in items {
        let key = key_fn(&item);
        if !key.is_empty() {
            map.put(key, item);
        }
    }
    map
}
