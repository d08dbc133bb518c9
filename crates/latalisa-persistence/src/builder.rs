//! Fluent, reusable query builder.

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::facade::Facade;
use crate::value::{Params, QueryStrategy, Value};

/// Accumulates parameters and pagination for one query and runs it through
/// a facade.
///
/// Setters consume and return the builder; terminal operations borrow it, so
/// the same builder can run again with the parameters it already holds.
///
/// ```rust,ignore
/// let mut query = facade
///     .query(QueryStrategy::Named, "Customer.byCity")
///     .set_param("city", "Recife");
/// let first: Option<Customer> = query.find()?;
/// query = query.set_param("city", "Natal");
/// let all: Vec<Customer> = query.list()?;
/// ```
pub struct QueryBuilder<'f, F> {
    facade: &'f mut F,
    strategy: QueryStrategy,
    text: String,
    start: Option<usize>,
    max: Option<usize>,
    params: Params,
}

impl<'f, F: Facade> QueryBuilder<'f, F> {
    pub fn new(facade: &'f mut F, strategy: QueryStrategy, text: impl Into<String>) -> Self {
        Self {
            facade,
            strategy,
            text: text.into(),
            start: None,
            max: None,
            params: Params::new(),
        }
    }

    // ============================================================================
    // Configuration
    // ============================================================================

    pub fn set_max_results(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    pub fn set_start_result(mut self, start: usize) -> Self {
        self.start = Some(start);
        self
    }

    pub fn clear_max_results(mut self) -> Self {
        self.max = None;
        self
    }

    pub fn clear_start_result(mut self) -> Self {
        self.start = None;
        self
    }

    pub fn set_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Replaces every parameter with `params`.
    pub fn set_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn add_params<I, K>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(name, value)| (name.into(), value)));
        self
    }

    pub fn remove_param(mut self, name: &str) -> Self {
        self.params.remove(name);
        self
    }

    pub fn clear_params(mut self) -> Self {
        self.params.clear();
        self
    }

    pub fn strategy(&self) -> QueryStrategy {
        self.strategy
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start_result(&self) -> Option<usize> {
        self.start
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    // ============================================================================
    // Terminal operations
    // ============================================================================

    /// Returns the first row of at most one, or `None` when nothing matches.
    pub fn find<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let rows =
            self.facade
                .list::<T>(self.strategy, &self.text, &self.params, self.start, Some(1))?;
        Ok(rows.into_iter().next())
    }

    pub fn find_with<T: DeserializeOwned, R>(&mut self, f: impl FnOnce(Option<T>) -> R) -> Result<R> {
        self.find().map(f)
    }

    pub fn list<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        self.facade
            .list(self.strategy, &self.text, &self.params, self.start, self.max)
    }

    pub fn list_with<T: DeserializeOwned, R>(&mut self, f: impl FnOnce(Vec<T>) -> R) -> Result<R> {
        self.list().map(f)
    }

    /// Returns exactly one row; no row or several rows are errors.
    pub fn single<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.facade.single(self.strategy, &self.text, &self.params)
    }

    pub fn execute(&mut self) -> Result<usize> {
        self.facade.execute(self.strategy, &self.text, &self.params)
    }
}
