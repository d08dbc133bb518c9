//! Staged construction of unique-key mappings.

use std::collections::HashMap;
use std::hash::Hash;

use crate::builder::Builder;

/// Fluent accumulator that snapshots into a `HashMap`.
///
/// # Example
///
/// ```
/// use latalisa_builders::{Builder, MapBuilder};
///
/// let nickname: Option<&str> = None;
/// let map = MapBuilder::new()
///     .put("name", "Ana")
///     .put_if_not_null("nickname", nickname)
///     .build();
///
/// assert_eq!(map.len(), 1);
/// assert_eq!(map["name"], "Ana");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapBuilder<K, V>
where
    K: Eq + Hash,
{
    source: HashMap<K, V>,
}

impl<K, V> MapBuilder<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty builder.
    pub fn new() -> Self {
        MapBuilder {
            source: HashMap::new(),
        }
    }

    /// Creates a builder staged with the given pairs; later keys overwrite earlier ones.
    pub fn of<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new().put_all(pairs)
    }

    /// Inserts or replaces the value under `key`.
    pub fn put(mut self, key: K, value: V) -> Self {
        self.source.insert(key, value);
        self
    }

    /// Inserts the value only when it is present; `None` leaves the builder untouched.
    pub fn put_if_not_null(self, key: K, value: Option<V>) -> Self {
        match value {
            Some(value) => self.put(key, value),
            None => self,
        }
    }

    /// Removes the entry under `key`, if any.
    pub fn remove(mut self, key: &K) -> Self {
        self.source.remove(key);
        self
    }

    /// Inserts every pair, replacing existing keys.
    pub fn put_all<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.source.extend(pairs);
        self
    }

    /// Removes every staged entry.
    pub fn clear(mut self) -> Self {
        self.source.clear();
        self
    }

    /// Returns the staged value under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.source.get(key)
    }

    /// Returns `true` if `key` is staged.
    pub fn contains_key(&self, key: &K) -> bool {
        self.source.contains_key(key)
    }

    /// Returns the number of staged entries.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

impl<K, V> Default for MapBuilder<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for MapBuilder<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl<K, V> Builder for MapBuilder<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    type Output = HashMap<K, V>;

    fn build(&self) -> HashMap<K, V> {
        self.source.clone()
    }
}
