//! Ordered map type for bencode dictionaries.
//!
//! This module provides [`Dict`], a wrapper around [`IndexMap`] that keeps
//! dictionary entries in insertion order. Decoding a free-form dictionary
//! preserves the key order found on the wire, and schema binding relies on
//! positional access to match decoded keys against declared field names.
//!
//! Keys are raw byte strings: bencode keys may contain any byte value,
//! including bytes that are not valid UTF-8.
//!
//! ## Examples
//!
//! ```rust
//! use benq::{Dict, Value};
//!
//! let mut dict = Dict::new();
//! dict.insert(b"name".to_vec(), Value::from("alice"));
//! dict.insert(b"age".to_vec(), Value::from(30));
//!
//! assert_eq!(dict.len(), 2);
//! assert_eq!(dict.get(b"name").and_then(|v| v.as_str()), Some("alice"));
//! ```

use crate::Value;
use indexmap::IndexMap;

/// An insertion-ordered map of byte-string keys to bencode values.
///
/// Canonical bencode requires dictionary keys in strictly increasing raw
/// byte order; [`Dict`] itself does not enforce that, so that free-form
/// decoding can represent whatever order the input carries. The encoder
/// checks canonical order when a dictionary is written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dict(IndexMap<Vec<u8>, Value>);

impl Dict {
    /// Creates an empty `Dict`.
    #[must_use]
    pub fn new() -> Self {
        Dict(IndexMap::new())
    }

    /// Creates an empty `Dict` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Dict(IndexMap::with_capacity(capacity))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Inserts a key-value pair, appending it if the key is new.
    ///
    /// Returns the previous value if the key was already present.
    pub fn insert(&mut self, key: Vec<u8>, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the entry at positional index `index`.
    ///
    /// Schema binding uses this to match decoded keys positionally.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&Vec<u8>, &Value)> {
        self.0.get_index(index)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key from the map, preserving the order of the remaining
    /// entries. Returns the removed value, if any.
    pub fn shift_remove(&mut self, key: &[u8]) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Vec<u8>, Value> {
        self.0.iter()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Vec<u8>, Value> {
        self.0.keys()
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Vec<u8>, Value> {
        self.0.values()
    }

    /// Returns `true` if keys are strictly increasing in raw byte order,
    /// i.e. the map already has a canonical encoding.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.0.keys().zip(self.0.keys().skip(1)).all(|(a, b)| a < b)
    }

    /// Sorts entries into canonical (raw byte lexicographic) key order.
    pub fn sort_keys(&mut self) {
        self.0.sort_keys();
    }
}

impl FromIterator<(Vec<u8>, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (Vec<u8>, Value)>>(iter: I) -> Self {
        Dict(IndexMap::from_iter(iter))
    }
}

impl IntoIterator for Dict {
    type Item = (Vec<u8>, Value);
    type IntoIter = indexmap::map::IntoIter<Vec<u8>, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = (&'a Vec<u8>, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Vec<u8>, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
