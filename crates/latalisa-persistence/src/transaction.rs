//! Transactional facade.

use tracing::warn;

use crate::context::PersistenceContext;
use crate::error::Result;
use crate::facade::{Facade, QueryFacade};
use crate::value::{Params, QueryStrategy, Record, Value};

/// Runs `work` between `begin` and `commit`.
///
/// If `work` or the commit fails, the transaction is rolled back and that
/// error is returned; a failed rollback is logged and does not replace it.
pub fn in_transaction<C, T>(
    facade: &mut QueryFacade<C>,
    work: impl FnOnce(&mut QueryFacade<C>) -> Result<T>,
) -> Result<T>
where
    C: PersistenceContext,
{
    facade.context_mut().begin()?;
    let outcome = work(facade).and_then(|value| facade.context_mut().commit().map(|()| value));
    if outcome.is_err() {
        if let Err(rollback) = facade.context_mut().rollback() {
            warn!(error = %rollback, "rollback failed");
        }
    }
    outcome
}

/// Facade whose mutating operations each run in their own transaction.
///
/// Queries and reads run outside a transaction, exactly as in
/// [`QueryFacade`].
#[derive(Debug)]
pub struct Transactional<C> {
    inner: QueryFacade<C>,
}

impl<C: PersistenceContext> Transactional<C> {
    pub fn new(context: C) -> Self {
        Self {
            inner: QueryFacade::new(context),
        }
    }

    /// Runs several operations in one transaction.
    pub fn transaction<T>(&mut self, work: impl FnOnce(&mut QueryFacade<C>) -> Result<T>) -> Result<T> {
        in_transaction(&mut self.inner, work)
    }

    pub fn context(&self) -> &C {
        self.inner.context()
    }

    pub fn into_inner(self) -> C {
        self.inner.into_inner()
    }
}

impl<C: PersistenceContext> Facade for Transactional<C> {
    fn single_record(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
        params: &Params,
    ) -> Result<Record> {
        self.inner.single_record(strategy, text, params)
    }

    fn list_records(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
        params: &Params,
        start: Option<usize>,
        max: Option<usize>,
    ) -> Result<Vec<Record>> {
        self.inner.list_records(strategy, text, params, start, max)
    }

    fn execute(&mut self, strategy: QueryStrategy, text: &str, params: &Params) -> Result<usize> {
        self.transaction(|facade| facade.execute(strategy, text, params))
    }

    fn create_record(&mut self, entity: &str, record: Record) -> Result<Record> {
        self.transaction(|facade| facade.create_record(entity, record))
    }

    fn read_record(&mut self, entity: &str, key: &Value) -> Result<Option<Record>> {
        self.inner.read_record(entity, key)
    }

    fn update_record(&mut self, entity: &str, record: Record) -> Result<Record> {
        self.transaction(|facade| facade.update_record(entity, record))
    }

    fn delete_record(&mut self, entity: &str, key: &Value) -> Result<bool> {
        self.transaction(|facade| facade.delete_record(entity, key))
    }
}
