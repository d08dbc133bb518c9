//! Staged construction of ordered sequences.

use once_cell::sync::Lazy;

use crate::builder::Builder;
use crate::error::{BuilderError, Result};

/// Fluent accumulator that snapshots into a `Vec`.
///
/// Every [`build`](Builder::build) returns an independent copy, so the
/// builder can keep changing without affecting earlier snapshots.
///
/// # Example
///
/// ```
/// use latalisa_builders::{Builder, ListBuilder};
///
/// let builder = ListBuilder::of(1, [2, 3]);
/// let first = builder.build();
/// let builder = builder.add(4);
///
/// assert_eq!(first, vec![1, 2, 3]);
/// assert_eq!(builder.build(), vec![1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBuilder<E> {
    source: Vec<E>,
}

impl<E> ListBuilder<E> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        ListBuilder { source: Vec::new() }
    }

    /// Creates a builder staged with `first` followed by `more`.
    pub fn of<I>(first: E, more: I) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        Self::new().add(first).add_all(more)
    }

    /// Appends an element.
    pub fn add(mut self, element: E) -> Self {
        self.source.push(element);
        self
    }

    /// Inserts an element at `index`, shifting later elements right.
    ///
    /// On an out-of-range index the builder is left unchanged.
    pub fn insert(&mut self, index: usize, element: E) -> Result<&mut Self> {
        self.check_index(index, self.source.len() + 1)?;
        self.source.insert(index, element);
        Ok(self)
    }

    /// Replaces the element at `index`.
    pub fn set(&mut self, index: usize, element: E) -> Result<&mut Self> {
        self.check_index(index, self.source.len())?;
        self.source[index] = element;
        Ok(self)
    }

    /// Removes the element at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<&mut Self> {
        self.check_index(index, self.source.len())?;
        self.source.remove(index);
        Ok(self)
    }

    /// Appends every element of `elements`.
    pub fn add_all<I>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        self.source.extend(elements);
        self
    }

    /// Inserts every element of `elements` starting at `index`, keeping their order.
    pub fn insert_all<I>(&mut self, index: usize, elements: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = E>,
    {
        self.check_index(index, self.source.len() + 1)?;
        let tail = self.source.split_off(index);
        self.source.extend(elements);
        self.source.extend(tail);
        Ok(self)
    }

    /// Removes every staged element.
    pub fn clear(mut self) -> Self {
        self.source.clear();
        self
    }

    /// Returns the number of staged elements.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Borrows the staged elements.
    pub fn as_slice(&self) -> &[E] {
        &self.source
    }

    /// Consumes the builder, returning the staged elements without copying.
    pub fn into_vec(self) -> Vec<E> {
        self.source
    }

    /// Fails unless `index < bound`.
    fn check_index(&self, index: usize, bound: usize) -> Result<()> {
        if index >= bound {
            return Err(BuilderError::IndexOutOfBounds {
                index,
                len: self.source.len(),
            });
        }
        Ok(())
    }
}

impl<E: PartialEq> ListBuilder<E> {
    /// Removes the first element equal to `element`, if any.
    pub fn remove(mut self, element: &E) -> Self {
        if let Some(position) = self.source.iter().position(|e| e == element) {
            self.source.remove(position);
        }
        self
    }

    /// Removes every element equal to any element of `elements`.
    pub fn remove_all(mut self, elements: &[E]) -> Self {
        self.source.retain(|e| !elements.contains(e));
        self
    }
}

impl<E> Default for ListBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> FromIterator<E> for ListBuilder<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        ListBuilder {
            source: iter.into_iter().collect(),
        }
    }
}

impl<E: Clone> Builder for ListBuilder<E> {
    type Output = Vec<E>;

    fn build(&self) -> Vec<E> {
        self.source.clone()
    }
}

/// Accumulates `next` into `accumulator`; either side may be absent.
///
/// Suited to `Iterator::fold` or `reduce` over optional batches.
pub fn merge_lists<E>(accumulator: Option<Vec<E>>, next: Option<Vec<E>>) -> Vec<E> {
    let mut accumulator = accumulator.unwrap_or_default();
    accumulator.extend(next.unwrap_or_default());
    accumulator
}

type LazyInit<E> = Box<dyn FnOnce() -> Vec<E> + Send>;

/// A read-only list whose contents are produced on first access.
///
/// The constructor runs at most once, even under concurrent access.
pub struct LazyList<E> {
    source: Lazy<Vec<E>, LazyInit<E>>,
}

impl<E> LazyList<E> {
    /// Creates a list that calls `constructor` the first time it is read.
    pub fn new<F>(constructor: F) -> Self
    where
        F: FnOnce() -> Vec<E> + Send + 'static,
    {
        LazyList {
            source: Lazy::new(Box::new(constructor)),
        }
    }

    /// Returns the element at `index`, initializing the list if needed.
    pub fn get(&self, index: usize) -> Option<&E> {
        self.source.get(index)
    }

    /// Returns the number of elements, initializing the list if needed.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Returns `true` if the list is empty, initializing it if needed.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Iterates the elements, initializing the list if needed.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.source.iter()
    }

    /// Returns `true` once the constructor has run.
    pub fn is_initialized(&self) -> bool {
        Lazy::get(&self.source).is_some()
    }
}

impl<E: std::fmt::Debug> std::fmt::Debug for LazyList<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match Lazy::get(&self.source) {
            Some(items) => f.debug_tuple("LazyList").field(items).finish(),
            None => f.write_str("LazyList(<uninitialized>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn add_and_build() {
        let list = ListBuilder::new().add("a").add("b").build();
        assert_eq!(list, vec!["a", "b"]);
    }

    #[test]
    fn snapshot_is_independent() {
        let builder = ListBuilder::of(1, [2]);
        let snapshot = builder.build();
        let builder = builder.clear().add(9);
        assert_eq!(snapshot, vec![1, 2]);
        assert_eq!(builder.build(), vec![9]);
    }

    #[test]
    fn index_operations() {
        let mut builder = ListBuilder::of('a', ['c']);
        builder
            .insert(1, 'b')
            .and_then(|b| b.set(0, 'A'))
            .and_then(|b| b.insert(3, 'd'))
            .unwrap();
        assert_eq!(builder.build(), vec!['A', 'b', 'c', 'd']);

        let mut builder = ListBuilder::of(1, [2, 3]);
        builder.remove_at(1).unwrap();
        assert_eq!(builder.build(), vec![1, 3]);
    }

    #[test]
    fn insert_all_keeps_order() {
        let mut builder = ListBuilder::of(1, [5]);
        builder.insert_all(1, [2, 3, 4]).unwrap();
        assert_eq!(builder.build(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let err = ListBuilder::of(1, []).set(1, 2).unwrap_err();
        assert_eq!(err, BuilderError::IndexOutOfBounds { index: 1, len: 1 });

        let err = ListBuilder::<i32>::new().set(0, 2).unwrap_err();
        assert_eq!(err, BuilderError::IndexOutOfBounds { index: 0, len: 0 });

        assert!(ListBuilder::of(1, []).insert(2, 2).is_err());
        assert!(ListBuilder::of(1, []).remove_at(1).is_err());
        assert!(ListBuilder::of(1, []).insert_all(2, [3]).is_err());
    }

    #[test]
    fn failed_index_operations_keep_the_staged_elements() {
        let mut builder = ListBuilder::of(1, [2]);
        assert!(builder.insert(5, 9).is_err());
        assert!(builder.set(2, 9).is_err());
        assert!(builder.remove_at(2).is_err());
        assert!(builder.insert_all(3, [9]).is_err());
        assert_eq!(builder.as_slice(), &[1, 2]);

        builder.insert(2, 3).unwrap();
        assert_eq!(builder.add(4).build(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn remove_by_value() {
        let list = ListBuilder::of(1, [2, 1, 3]).remove(&1).build();
        assert_eq!(list, vec![2, 1, 3]);

        let list = ListBuilder::of(1, [2, 1, 3]).remove_all(&[1, 3]).build();
        assert_eq!(list, vec![2]);
    }

    #[test]
    fn merge_optional_batches() {
        assert_eq!(merge_lists(None, Some(vec![1])), vec![1]);
        assert_eq!(merge_lists(Some(vec![1]), None), vec![1]);
        assert_eq!(merge_lists(Some(vec![1]), Some(vec![2])), vec![1, 2]);
        assert!(merge_lists::<i32>(None, None).is_empty());
    }

    #[test]
    fn lazy_list_initializes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let lazy = LazyList::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![10, 20]
        });

        assert!(!lazy.is_initialized());
        assert_eq!(lazy.len(), 2);
        assert_eq!(lazy.get(1), Some(&20));
        assert_eq!(lazy.iter().sum::<i32>(), 30);
        assert!(lazy.is_initialized());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
