//! Composite orderings built from key extractors.
//!
//! A [`ComparatorBuilder`] accumulates an ordered chain of pairwise
//! comparisons. [`ComparatorBuilder::build`] snapshots that chain into a
//! [`Comparator`], which evaluates the comparisons in insertion order and
//! returns the first result that is not `Equal`.
//!
//! Absent values are handled by a fixed policy that does not depend on the
//! configured chain: `None` sorts before any `Some`, and two `None`s compare
//! equal. See [`Comparator::compare_nullable`].

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::builder::Builder;

type CompareFn<T> = dyn Fn(&T, &T) -> Ordering + Send + Sync;

/// Direction of one link in a comparator chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Asc,
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }
}

/// Fluent accumulator of orderings over `T`.
///
/// # Example
///
/// ```
/// use latalisa_builders::{Builder, ComparatorBuilder, Dir};
///
/// struct Field {
///     text: String,
///     columns: u32,
/// }
///
/// let mut fields = vec![
///     Field { text: "Titulo 10".into(), columns: 10 },
///     Field { text: "Titulo 8".into(), columns: 8 },
///     Field { text: "Titulo 11".into(), columns: 10 },
///     Field { text: "Titulo 2".into(), columns: 2 },
/// ];
///
/// let comparator = ComparatorBuilder::new()
///     .add(|f: &Field| f.columns)
///     .add_dir(|f: &Field| f.text.clone(), Dir::Asc)
///     .build();
///
/// comparator.sort(&mut fields);
/// assert_eq!(fields[2].text, "Titulo 10");
/// ```
pub struct ComparatorBuilder<T> {
    comparators: Vec<Arc<CompareFn<T>>>,
}

impl<T: 'static> ComparatorBuilder<T> {
    /// Creates a builder with an empty chain.
    ///
    /// An empty chain considers every pair of values equal.
    pub fn new() -> Self {
        ComparatorBuilder {
            comparators: Vec::new(),
        }
    }

    /// Creates a builder whose first ordering uses the natural order of `extractor`'s key.
    pub fn by<K, F>(extractor: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::new().add(extractor)
    }

    /// Creates a builder seeded with already built comparators.
    pub fn of<I>(comparators: I) -> Self
    where
        I: IntoIterator<Item = Comparator<T>>,
    {
        Self::new().extend(comparators)
    }

    /// Appends an ordering by the natural order of the extracted key.
    ///
    /// `Option` keys work as expected: `None` is the minimal value.
    pub fn add<K, F>(self, extractor: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.add_comparator(move |a: &T, b: &T| extractor(a).cmp(&extractor(b)))
    }

    /// Appends an ordering by a borrowed key, avoiding a clone per comparison.
    pub fn add_ref<K, F>(self, extractor: F) -> Self
    where
        K: Ord + ?Sized,
        F: Fn(&T) -> &K + Send + Sync + 'static,
    {
        self.add_comparator(move |a: &T, b: &T| extractor(a).cmp(extractor(b)))
    }

    /// Appends an ordering by the extracted key using the supplied key comparison.
    pub fn add_by<K, F, C>(self, extractor: F, comparator: C) -> Self
    where
        F: Fn(&T) -> K + Send + Sync + 'static,
        C: Fn(&K, &K) -> Ordering + Send + Sync + 'static,
    {
        self.add_comparator(move |a: &T, b: &T| comparator(&extractor(a), &extractor(b)))
    }

    /// Appends an ordering by the natural order of the key in the given direction.
    pub fn add_dir<K, F>(self, extractor: F, dir: Dir) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.add_comparator(move |a: &T, b: &T| dir.apply(extractor(a).cmp(&extractor(b))))
    }

    /// Appends a raw pairwise comparison.
    pub fn add_comparator<C>(mut self, comparator: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.comparators.push(Arc::new(comparator));
        self
    }

    /// Appends every comparator in `comparators`, each as one link of the chain.
    pub fn extend<I>(self, comparators: I) -> Self
    where
        I: IntoIterator<Item = Comparator<T>>,
    {
        comparators.into_iter().fold(self, |builder, comparator| {
            builder.add_comparator(move |a: &T, b: &T| comparator.compare(a, b))
        })
    }

    /// Returns the number of orderings in the chain.
    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    /// Returns `true` if no ordering was added yet.
    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    /// Snapshots the chain into a comparator with the whole order reversed.
    pub fn build_reversed(&self) -> Comparator<T> {
        self.build().reversed()
    }
}

impl<T: 'static> Default for ComparatorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Builder for ComparatorBuilder<T> {
    type Output = Comparator<T>;

    fn build(&self) -> Comparator<T> {
        Comparator {
            chain: self.comparators.iter().cloned().collect(),
            reversed: false,
        }
    }
}

impl<T> fmt::Debug for ComparatorBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorBuilder")
            .field("len", &self.comparators.len())
            .finish()
    }
}

/// An immutable composite ordering produced by [`ComparatorBuilder::build`].
///
/// Cloning is cheap; clones share the same chain.
pub struct Comparator<T> {
    chain: Arc<[Arc<CompareFn<T>>]>,
    reversed: bool,
}

impl<T> Comparator<T> {
    /// Compares two values through the chain.
    ///
    /// Returns the first non-`Equal` result. When every link reports
    /// `Equal` the values are equal for this comparator; stable sorts then
    /// keep such values in their input order.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let ordering = self
            .chain
            .iter()
            .map(|comparator| comparator(a, b))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal);
        self.direction().apply(ordering)
    }

    /// Compares two possibly absent values.
    ///
    /// `None` sorts before any `Some`; two `None`s are equal. A reversed
    /// comparator reverses this policy too.
    pub fn compare_nullable(&self, a: Option<&T>, b: Option<&T>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.compare(a, b),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => self.direction().apply(Ordering::Less),
            (Some(_), None) => self.direction().apply(Ordering::Greater),
        }
    }

    /// Returns the same ordering with its direction flipped.
    pub fn reversed(&self) -> Self {
        Comparator {
            chain: Arc::clone(&self.chain),
            reversed: !self.reversed,
        }
    }

    /// Stable-sorts a slice with this comparator.
    pub fn sort(&self, items: &mut [T]) {
        items.sort_by(|a, b| self.compare(a, b));
    }

    /// Stable-sorts a slice of possibly absent values.
    pub fn sort_nullable(&self, items: &mut [Option<T>]) {
        items.sort_by(|a, b| self.compare_nullable(a.as_ref(), b.as_ref()));
    }

    /// Borrows this comparator as a plain closure, e.g. for `sort_by`.
    pub fn as_fn(&self) -> impl Fn(&T, &T) -> Ordering + '_ {
        move |a: &T, b: &T| self.compare(a, b)
    }

    /// Returns the number of links in the chain.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns `true` if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    fn direction(&self) -> Dir {
        if self.reversed {
            Dir::Desc
        } else {
            Dir::Asc
        }
    }
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Comparator {
            chain: Arc::clone(&self.chain),
            reversed: self.reversed,
        }
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator")
            .field("len", &self.chain.len())
            .field("reversed", &self.reversed)
            .finish()
    }
}
