//! In-memory persistence context.
//!
//! [`MemoryFactory`] owns a set of entity [`Tables`] and the query handlers
//! registered for them. Every [`MemoryContext`] it opens shares those
//! tables, the way connections share a database. Transactions snapshot the
//! tables on `begin` and restore the snapshot on `rollback`, which assumes
//! one writer at a time.
//!
//! ```rust,ignore
//! let factory = MemoryFactory::new()
//!     .table("Customer", "id")
//!     .handler(QueryStrategy::Named, "Customer.all", select_all("Customer"));
//! let mut facade = QueryFacade::new(factory.open()?);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::config::{FactoryLookup, UnitConfig};
use crate::context::{ContextFactory, PersistenceContext, QueryHandle};
use crate::error::{PersistenceError, Result};
use crate::value::{Params, QueryStrategy, Record, Value};

/// What a query handler produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Rows(Vec<Record>),
    Updated(usize),
}

/// Runs one registered query against the tables.
pub type QueryHandler = Arc<dyn Fn(&mut Tables, &Params) -> Result<QueryOutput> + Send + Sync>;

// ============================================================================
// Tables
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum RowKey {
    Int(i64),
    Text(String),
}

impl RowKey {
    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(RowKey::Int(i)),
                None => Some(RowKey::Text(n.to_string())),
            },
            serde_json::Value::String(s) => Some(RowKey::Text(s.clone())),
            other => Some(RowKey::Text(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
struct Table {
    key_field: String,
    next_key: i64,
    rows: BTreeMap<RowKey, Record>,
}

/// Entity tables keyed by entity name. Rows are kept in key order.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    tables: BTreeMap<String, Table>,
}

impl Tables {
    /// Defines a table whose primary key is `key_field`.
    pub fn define(&mut self, entity: &str, key_field: &str) {
        self.tables.entry(entity.to_string()).or_insert_with(|| Table {
            key_field: key_field.to_string(),
            next_key: 1,
            rows: BTreeMap::new(),
        });
    }

    fn table(&self, entity: &str) -> Result<&Table> {
        self.tables
            .get(entity)
            .ok_or_else(|| PersistenceError::UnknownEntity(entity.to_string()))
    }

    fn table_mut(&mut self, entity: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(entity)
            .ok_or_else(|| PersistenceError::UnknownEntity(entity.to_string()))
    }

    pub fn rows(&self, entity: &str) -> Result<impl Iterator<Item = &Record>> {
        Ok(self.table(entity)?.rows.values())
    }

    pub fn rows_mut(&mut self, entity: &str) -> Result<impl Iterator<Item = &mut Record>> {
        Ok(self.table_mut(entity)?.rows.values_mut())
    }

    pub fn len(&self, entity: &str) -> Result<usize> {
        Ok(self.table(entity)?.rows.len())
    }

    pub fn get(&self, entity: &str, key: &Value) -> Result<Option<&Record>> {
        let table = self.table(entity)?;
        Ok(RowKey::from_json(&key.to_json()).and_then(|key| table.rows.get(&key)))
    }

    /// Inserts a new row, generating an integer key when none is set.
    pub fn insert(&mut self, entity: &str, mut record: Record) -> Result<Record> {
        let table = self.table_mut(entity)?;
        let fields = record
            .as_object_mut()
            .ok_or_else(|| PersistenceError::backend(format!("{entity} record is not an object")))?;
        let key = match fields.get(&table.key_field).and_then(RowKey::from_json) {
            Some(key) => key,
            None => {
                let generated = table.next_key;
                fields.insert(table.key_field.clone(), serde_json::Value::from(generated));
                RowKey::Int(generated)
            }
        };
        if table.rows.contains_key(&key) {
            return Err(PersistenceError::backend(format!("duplicate key in {entity}")));
        }
        if let RowKey::Int(i) = key {
            table.next_key = table.next_key.max(i.saturating_add(1));
        }
        table.rows.insert(key, record.clone());
        Ok(record)
    }

    /// Overwrites the row with the record's key, inserting it when absent.
    pub fn replace(&mut self, entity: &str, record: Record) -> Result<Record> {
        let table = self.table_mut(entity)?;
        if let Some(key) = record.get(&table.key_field).and_then(RowKey::from_json) {
            if let Some(row) = table.rows.get_mut(&key) {
                *row = record.clone();
                return Ok(record);
            }
        }
        self.insert(entity, record)
    }

    pub fn delete(&mut self, entity: &str, key: &Value) -> Result<bool> {
        let table = self.table_mut(entity)?;
        Ok(RowKey::from_json(&key.to_json())
            .and_then(|key| table.rows.remove(&key))
            .is_some())
    }

    /// Removes rows matching `predicate` and returns how many were removed.
    pub fn delete_where(&mut self, entity: &str, mut predicate: impl FnMut(&Record) -> bool) -> Result<usize> {
        let table = self.table_mut(entity)?;
        let before = table.rows.len();
        table.rows.retain(|_, row| !predicate(row));
        Ok(before - table.rows.len())
    }
}

/// True when every parameter named in `fields` equals the row's field.
pub fn row_matches(row: &Record, params: &Params, fields: &[&str]) -> bool {
    fields.iter().all(|field| {
        let expected = params.get(*field).map_or(serde_json::Value::Null, Value::to_json);
        row.get(*field).unwrap_or(&serde_json::Value::Null) == &expected
    })
}

/// Handler listing every row of `entity`.
pub fn select_all(entity: &str) -> QueryHandler {
    let entity = entity.to_string();
    Arc::new(move |tables: &mut Tables, _: &Params| -> Result<QueryOutput> {
        Ok(QueryOutput::Rows(tables.rows(&entity)?.cloned().collect()))
    })
}

/// Handler listing rows whose `fields` equal the parameters of the same name.
pub fn select_by(entity: &str, fields: &[&str]) -> QueryHandler {
    let entity = entity.to_string();
    let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
    Arc::new(move |tables: &mut Tables, params: &Params| -> Result<QueryOutput> {
        let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
        let rows = tables
            .rows(&entity)?
            .filter(|row| row_matches(row, params, &fields))
            .cloned()
            .collect();
        Ok(QueryOutput::Rows(rows))
    })
}

// ============================================================================
// Factory and context
// ============================================================================

type HandlerMap = HashMap<(QueryStrategy, String), QueryHandler>;

/// Shared tables plus registered queries.
#[derive(Clone, Default)]
pub struct MemoryFactory {
    tables: Arc<Mutex<Tables>>,
    handlers: Arc<HandlerMap>,
}

impl MemoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(self, entity: &str, key_field: &str) -> Self {
        lock(&self.tables).define(entity, key_field);
        self
    }

    pub fn handler(mut self, strategy: QueryStrategy, text: impl Into<String>, handler: QueryHandler) -> Self {
        Arc::make_mut(&mut self.handlers).insert((strategy, text.into()), handler);
        self
    }

    /// A copy of the current table contents.
    pub fn snapshot(&self) -> Tables {
        lock(&self.tables).clone()
    }

    pub fn open_context(&self) -> MemoryContext {
        MemoryContext {
            tables: Arc::clone(&self.tables),
            handlers: Arc::clone(&self.handlers),
            snapshot: None,
            journal: Vec::new(),
            clears: 0,
        }
    }
}

impl fmt::Debug for MemoryFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFactory")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl ContextFactory for MemoryFactory {
    type Context = MemoryContext;

    fn open(&self) -> Result<MemoryContext> {
        Ok(self.open_context())
    }
}

fn lock(tables: &Mutex<Tables>) -> MutexGuard<'_, Tables> {
    tables.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One entry of a context's transaction journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxEvent {
    Begin,
    Commit,
    Rollback,
}

pub struct MemoryContext {
    tables: Arc<Mutex<Tables>>,
    handlers: Arc<HandlerMap>,
    snapshot: Option<Tables>,
    journal: Vec<TxEvent>,
    clears: usize,
}

impl MemoryContext {
    /// Transaction events in the order they happened.
    pub fn journal(&self) -> &[TxEvent] {
        &self.journal
    }

    /// How many times the context was cleared.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn with_tables<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        f(&*lock(&self.tables))
    }
}

impl fmt::Debug for MemoryContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryContext")
            .field("in_transaction", &self.in_transaction())
            .field("journal", &self.journal)
            .field("clears", &self.clears)
            .finish()
    }
}

impl PersistenceContext for MemoryContext {
    fn create_query(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
    ) -> Result<Box<dyn QueryHandle + '_>> {
        let handler = self
            .handlers
            .get(&(strategy, text.to_string()))
            .cloned()
            .ok_or_else(|| PersistenceError::UnknownQuery {
                strategy,
                text: text.to_string(),
            })?;
        Ok(Box::new(MemoryQuery {
            tables: Arc::clone(&self.tables),
            handler,
            params: Params::new(),
            first: 0,
            max: None,
        }))
    }

    fn persist(&mut self, entity: &str, record: Record) -> Result<Record> {
        lock(&self.tables).insert(entity, record)
    }

    fn find(&mut self, entity: &str, key: &Value) -> Result<Option<Record>> {
        Ok(lock(&self.tables).get(entity, key)?.cloned())
    }

    fn merge(&mut self, entity: &str, record: Record) -> Result<Record> {
        lock(&self.tables).replace(entity, record)
    }

    fn remove(&mut self, entity: &str, key: &Value) -> Result<bool> {
        lock(&self.tables).delete(entity, key)
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn begin(&mut self) -> Result<()> {
        if self.snapshot.is_some() {
            return Err(PersistenceError::transaction("transaction already active"));
        }
        self.snapshot = Some(lock(&self.tables).clone());
        self.journal.push(TxEvent::Begin);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.snapshot.take().is_none() {
            return Err(PersistenceError::transaction("no active transaction"));
        }
        self.journal.push(TxEvent::Commit);
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        let snapshot = self
            .snapshot
            .take()
            .ok_or_else(|| PersistenceError::transaction("no active transaction"))?;
        *lock(&self.tables) = snapshot;
        self.journal.push(TxEvent::Rollback);
        debug!("transaction rolled back");
        Ok(())
    }
}

struct MemoryQuery {
    tables: Arc<Mutex<Tables>>,
    handler: QueryHandler,
    params: Params,
    first: usize,
    max: Option<usize>,
}

impl MemoryQuery {
    fn run(&self) -> Result<QueryOutput> {
        (self.handler)(&mut *lock(&self.tables), &self.params)
    }
}

impl QueryHandle for MemoryQuery {
    fn set_parameter(&mut self, name: &str, value: Value) -> Result<()> {
        self.params.insert(name.to_string(), value);
        Ok(())
    }

    fn set_first_result(&mut self, start: usize) {
        self.first = start;
    }

    fn set_max_results(&mut self, max: usize) {
        self.max = Some(max);
    }

    fn result_list(&mut self) -> Result<Vec<Record>> {
        match self.run()? {
            QueryOutput::Rows(rows) => Ok(rows
                .into_iter()
                .skip(self.first)
                .take(self.max.unwrap_or(usize::MAX))
                .collect()),
            QueryOutput::Updated(_) => Err(PersistenceError::backend("statement does not return rows")),
        }
    }

    fn single_result(&mut self) -> Result<Record> {
        let mut rows = self.result_list()?;
        match rows.len() {
            0 => Err(PersistenceError::NoResult),
            1 => Ok(rows.remove(0)),
            n => Err(PersistenceError::NonUniqueResult(n)),
        }
    }

    fn execute_update(&mut self) -> Result<usize> {
        match self.run()? {
            QueryOutput::Updated(count) => Ok(count),
            QueryOutput::Rows(_) => Err(PersistenceError::backend("query does not update rows")),
        }
    }
}

/// Creates one independent [`MemoryFactory`] per unit.
pub struct MemoryLookup {
    setup: Box<dyn Fn(&UnitConfig) -> MemoryFactory + Send + Sync>,
    created: AtomicUsize,
}

impl MemoryLookup {
    pub fn new(setup: impl Fn(&UnitConfig) -> MemoryFactory + Send + Sync + 'static) -> Self {
        Self {
            setup: Box::new(setup),
            created: AtomicUsize::new(0),
        }
    }

    /// How many factories were created so far.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl FactoryLookup for MemoryLookup {
    type Factory = MemoryFactory;

    fn create_factory(&self, unit: &UnitConfig) -> Result<MemoryFactory> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok((self.setup)(unit))
    }
}
