//! The seam between facades and a persistence backend.
//!
//! A [`PersistenceContext`] plays the role of an entity manager: it resolves
//! query text into a [`QueryHandle`], stores and loads records, and brackets
//! work in transactions. Facades never talk to a database directly, so any
//! backend that implements these two traits can be plugged in.

use crate::error::Result;
use crate::value::{Params, QueryStrategy, Record, Value};

/// A resolved query, ready for parameters and pagination.
pub trait QueryHandle {
    /// Binds a named parameter.
    fn set_parameter(&mut self, name: &str, value: Value) -> Result<()>;

    /// Skips the first `start` rows.
    fn set_first_result(&mut self, start: usize);

    /// Limits the number of rows returned.
    fn set_max_results(&mut self, max: usize);

    /// Runs the query and returns every row within the pagination bounds.
    fn result_list(&mut self) -> Result<Vec<Record>>;

    /// Runs the query and returns its only row.
    ///
    /// Fails with [`NoResult`](crate::PersistenceError::NoResult) or
    /// [`NonUniqueResult`](crate::PersistenceError::NonUniqueResult).
    fn single_result(&mut self) -> Result<Record>;

    /// Runs a statement and returns the number of affected rows.
    fn execute_update(&mut self) -> Result<usize>;

    /// Binds every parameter in `params`.
    fn bind_all(&mut self, params: &Params) -> Result<()> {
        for (name, value) in params {
            self.set_parameter(name, value.clone())?;
        }
        Ok(())
    }
}

/// An entity-manager-like unit of work.
pub trait PersistenceContext {
    /// Resolves `text` with the given strategy.
    fn create_query(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
    ) -> Result<Box<dyn QueryHandle + '_>>;

    /// Stores a new entity and returns it with any generated key filled in.
    fn persist(&mut self, entity: &str, record: Record) -> Result<Record>;

    /// Loads an entity by primary key.
    fn find(&mut self, entity: &str, key: &Value) -> Result<Option<Record>>;

    /// Writes the state of an existing entity and returns the stored copy.
    fn merge(&mut self, entity: &str, record: Record) -> Result<Record>;

    /// Removes an entity by primary key; `false` when it does not exist.
    fn remove(&mut self, entity: &str, key: &Value) -> Result<bool>;

    /// Detaches everything the context is tracking.
    fn clear(&mut self);

    fn begin(&mut self) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;
}

/// Opens contexts for one persistence unit.
pub trait ContextFactory: Send + Sync {
    type Context: PersistenceContext;

    fn open(&self) -> Result<Self::Context>;
}
