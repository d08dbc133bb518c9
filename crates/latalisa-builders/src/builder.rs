//! The single-method builder contract shared by every builder in this crate.

/// A value that can produce a derived artifact on demand.
///
/// `build` never consumes the builder: every call returns a fresh value
/// computed from the current staged state, so a builder can keep being
/// mutated after a snapshot was taken.
///
/// # Example
///
/// ```
/// use latalisa_builders::{Builder, ListBuilder};
///
/// let builder = ListBuilder::new().add(3).add(1).add(2);
/// let total: i32 = builder.build_with(|items| items.into_iter().sum());
/// assert_eq!(total, 6);
/// ```
pub trait Builder {
    /// The type produced by [`Builder::build`].
    type Output;

    /// Produces the artifact from the current state.
    fn build(&self) -> Self::Output;

    /// Produces the artifact and maps it immediately.
    fn build_with<R, F>(&self, function: F) -> R
    where
        F: FnOnce(Self::Output) -> R,
    {
        function(self.build())
    }
}
