//! Query facades.
//!
//! [`Facade`] separates *how* a query runs from *what* query runs. Backends
//! implement the record-level methods; the typed methods map records to and
//! from entity types with serde.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::builder::QueryBuilder;
use crate::context::PersistenceContext;
use crate::error::Result;
use crate::value::{Params, QueryStrategy, Record, Value};

/// A type stored by the persistence context under a fixed entity name.
pub trait Entity: Serialize + DeserializeOwned {
    const NAME: &'static str;
}

/// Converts a value into a record.
pub fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    Ok(serde_json::to_value(value)?)
}

/// Converts a record into a value.
pub fn from_record<T: DeserializeOwned>(record: Record) -> Result<T> {
    Ok(serde_json::from_value(record)?)
}

/// Query and CRUD operations against a persistence context.
///
/// Pagination bounds are `Option<usize>`; `None` leaves the bound to the
/// backend.
pub trait Facade {
    fn single_record(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
        params: &Params,
    ) -> Result<Record>;

    fn list_records(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
        params: &Params,
        start: Option<usize>,
        max: Option<usize>,
    ) -> Result<Vec<Record>>;

    /// Runs an update or delete statement and returns the affected row count.
    fn execute(&mut self, strategy: QueryStrategy, text: &str, params: &Params) -> Result<usize>;

    fn create_record(&mut self, entity: &str, record: Record) -> Result<Record>;

    fn read_record(&mut self, entity: &str, key: &Value) -> Result<Option<Record>>;

    fn update_record(&mut self, entity: &str, record: Record) -> Result<Record>;

    /// Removes an entity; `false` when nothing was found.
    fn delete_record(&mut self, entity: &str, key: &Value) -> Result<bool>;

    fn single<T: DeserializeOwned>(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
        params: &Params,
    ) -> Result<T>
    where
        Self: Sized,
    {
        from_record(self.single_record(strategy, text, params)?)
    }

    fn list<T: DeserializeOwned>(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
        params: &Params,
        start: Option<usize>,
        max: Option<usize>,
    ) -> Result<Vec<T>>
    where
        Self: Sized,
    {
        self.list_records(strategy, text, params, start, max)?
            .into_iter()
            .map(from_record)
            .collect()
    }

    fn create<E: Entity>(&mut self, entity: &E) -> Result<E>
    where
        Self: Sized,
    {
        from_record(self.create_record(E::NAME, to_record(entity)?)?)
    }

    fn read<E: Entity>(&mut self, key: impl Into<Value>) -> Result<Option<E>>
    where
        Self: Sized,
    {
        self.read_record(E::NAME, &key.into())?
            .map(from_record)
            .transpose()
    }

    fn update<E: Entity>(&mut self, entity: &E) -> Result<E>
    where
        Self: Sized,
    {
        from_record(self.update_record(E::NAME, to_record(entity)?)?)
    }

    fn delete<E: Entity>(&mut self, key: impl Into<Value>) -> Result<bool>
    where
        Self: Sized,
    {
        self.delete_record(E::NAME, &key.into())
    }

    /// Starts a reusable query builder for `text`.
    fn query(&mut self, strategy: QueryStrategy, text: impl Into<String>) -> QueryBuilder<'_, Self>
    where
        Self: Sized,
    {
        QueryBuilder::new(self, strategy, text)
    }
}

/// Plain facade over a context. Every operation runs outside a transaction.
#[derive(Debug)]
pub struct QueryFacade<C> {
    context: C,
}

impl<C: PersistenceContext> QueryFacade<C> {
    pub fn new(context: C) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_inner(self) -> C {
        self.context
    }
}

impl<C: PersistenceContext> Facade for QueryFacade<C> {
    #[tracing::instrument(level = "debug", skip(self, params), fields(params = params.len()))]
    fn single_record(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
        params: &Params,
    ) -> Result<Record> {
        let mut query = self.context.create_query(strategy, text)?;
        query.bind_all(params)?;
        query.single_result()
    }

    #[tracing::instrument(level = "debug", skip(self, params), fields(params = params.len()))]
    fn list_records(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
        params: &Params,
        start: Option<usize>,
        max: Option<usize>,
    ) -> Result<Vec<Record>> {
        self.context.clear();
        let mut query = self.context.create_query(strategy, text)?;
        if let Some(start) = start {
            query.set_first_result(start);
        }
        if let Some(max) = max {
            query.set_max_results(max);
        }
        query.bind_all(params)?;
        let rows = query.result_list()?;
        debug!(rows = rows.len(), "query listed");
        Ok(rows)
    }

    #[tracing::instrument(level = "debug", skip(self, params), fields(params = params.len()))]
    fn execute(&mut self, strategy: QueryStrategy, text: &str, params: &Params) -> Result<usize> {
        let mut query = self.context.create_query(strategy, text)?;
        query.bind_all(params)?;
        let affected = query.execute_update()?;
        debug!(affected, "statement executed");
        Ok(affected)
    }

    fn create_record(&mut self, entity: &str, record: Record) -> Result<Record> {
        self.context.persist(entity, record)
    }

    fn read_record(&mut self, entity: &str, key: &Value) -> Result<Option<Record>> {
        self.context.clear();
        self.context.find(entity, key)
    }

    fn update_record(&mut self, entity: &str, record: Record) -> Result<Record> {
        self.context.merge(entity, record)
    }

    fn delete_record(&mut self, entity: &str, key: &Value) -> Result<bool> {
        self.context.remove(entity, key)
    }
}
