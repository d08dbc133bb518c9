//! Staged construction of unique-element sets.

use std::collections::HashSet;
use std::hash::Hash;

use crate::builder::Builder;

/// Fluent accumulator that snapshots into a `HashSet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetBuilder<E>
where
    E: Eq + Hash,
{
    source: HashSet<E>,
}

impl<E> SetBuilder<E>
where
    E: Eq + Hash,
{
    /// Creates an empty builder.
    pub fn new() -> Self {
        SetBuilder {
            source: HashSet::new(),
        }
    }

    /// Creates a builder staged with `first` followed by `more`.
    pub fn of<I>(first: E, more: I) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        Self::new().add(first).add_all(more)
    }

    /// Adds an element; duplicates are ignored.
    pub fn add(mut self, element: E) -> Self {
        self.source.insert(element);
        self
    }

    /// Removes an element, if present.
    pub fn remove(mut self, element: &E) -> Self {
        self.source.remove(element);
        self
    }

    /// Adds every element of `elements`.
    pub fn add_all<I>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        self.source.extend(elements);
        self
    }

    /// Removes every element of `elements`.
    pub fn remove_all<'a, I>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = &'a E>,
        E: 'a,
    {
        for element in elements {
            self.source.remove(element);
        }
        self
    }

    /// Removes every staged element.
    pub fn clear(mut self) -> Self {
        self.source.clear();
        self
    }

    /// Returns `true` if `element` is staged.
    pub fn contains(&self, element: &E) -> bool {
        self.source.contains(element)
    }

    /// Returns the number of staged elements.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

impl<E> Default for SetBuilder<E>
where
    E: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> FromIterator<E> for SetBuilder<E>
where
    E: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::new().add_all(iter)
    }
}

impl<E> Builder for SetBuilder<E>
where
    E: Eq + Hash + Clone,
{
    type Output = HashSet<E>;

    fn build(&self) -> HashSet<E> {
        self.source.clone()
    }
}

/// Accumulates `next` into `accumulator`; either side may be absent.
pub fn merge_sets<E>(accumulator: Option<HashSet<E>>, next: Option<HashSet<E>>) -> HashSet<E>
where
    E: Eq + Hash,
{
    let mut accumulator = accumulator.unwrap_or_default();
    accumulator.extend(next.unwrap_or_default());
    accumulator
}
