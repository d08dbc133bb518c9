//! Several persistence units behind one entry point.
//!
//! [`MultiSource`] caches one context factory per unit name and hands out
//! explicit [`Session`] handles. Callers pass the session to whatever needs
//! persistence; nothing is kept in thread-local state.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::config::{FactoryLookup, UnitConfig};
use crate::context::{ContextFactory, PersistenceContext};
use crate::error::{PersistenceError, Result};
use crate::facade::{Facade, QueryFacade};
use crate::transaction::in_transaction;
use crate::value::{Params, QueryStrategy, Record, Value};

type ContextOf<L> = <<L as FactoryLookup>::Factory as ContextFactory>::Context;

/// Default properties for every unit created by a [`MultiSource`].
pub const DEFAULT_PROPERTIES: [(&str, &str); 3] = [
    ("generate_statistics", "true"),
    ("events_log", "false"),
    ("jmx", "true"),
];

pub struct MultiSource<L: FactoryLookup> {
    lookup: L,
    entities: Arc<BTreeMap<String, String>>,
    properties: BTreeMap<String, String>,
    factories: Mutex<HashMap<String, Arc<L::Factory>>>,
}

impl<L: FactoryLookup> MultiSource<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            entities: Arc::new(BTreeMap::new()),
            properties: DEFAULT_PROPERTIES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            factories: Mutex::new(HashMap::new()),
        }
    }

    /// Maps a logical entity name to the name the units store it under.
    pub fn map_entity(mut self, logical: impl Into<String>, stored: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.entities).insert(logical.into(), stored.into());
        self
    }

    /// Registers an entity stored under its own name.
    pub fn entity(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.map_entity(name.clone(), name)
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Resolves a logical entity name.
    pub fn resolve(&self, name: &str) -> Result<&str> {
        resolve(&self.entities, name)
    }

    /// The configuration used to create the factory for `unit`.
    ///
    /// Managed entities are the stored names of every mapping, sorted.
    pub fn unit_config(&self, unit: &str) -> UnitConfig {
        let mut managed: Vec<&String> = self.entities.values().collect();
        managed.sort();
        managed.dedup();
        UnitConfig::new(unit)
            .managed_entities(managed.into_iter().cloned())
            .properties(self.properties.clone())
    }

    /// Returns the cached factory for `unit`, creating it on first use.
    ///
    /// The lookup runs without the cache lock held, so it may call back into
    /// this source. When two callers race on the same unit, the first factory
    /// stored wins and the other is dropped.
    pub fn factory(&self, unit: &str) -> Result<Arc<L::Factory>> {
        if unit.is_empty() {
            return Err(PersistenceError::UnitNotDefined);
        }
        if let Some(factory) = self.cached(unit) {
            return Ok(factory);
        }
        let built = Arc::new(self.unit_config(unit).build(&self.lookup)?);
        let mut factories = self.factories.lock().unwrap_or_else(PoisonError::into_inner);
        let factory = factories
            .entry(unit.to_string())
            .or_insert_with(|| {
                info!(unit, "persistence unit created");
                built
            });
        Ok(Arc::clone(factory))
    }

    fn cached(&self, unit: &str) -> Option<Arc<L::Factory>> {
        self.factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(unit)
            .map(Arc::clone)
    }

    pub fn factory_count(&self) -> usize {
        self.factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Opens a session on `unit`.
    pub fn session(&self, unit: &str) -> Result<Session<ContextOf<L>>> {
        let context = self.factory(unit)?.open()?;
        debug!(unit, "session opened");
        Ok(Session {
            unit: unit.to_string(),
            entities: Arc::clone(&self.entities),
            facade: QueryFacade::new(context),
        })
    }
}

fn resolve<'a>(entities: &'a BTreeMap<String, String>, name: &str) -> Result<&'a str> {
    entities
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| PersistenceError::UnknownEntity(name.to_string()))
}

/// A context opened on one unit.
///
/// Creates, updates, deletes and statements each run in their own
/// transaction; use [`Session::transaction`] to group several.
#[derive(Debug)]
pub struct Session<C> {
    unit: String,
    entities: Arc<BTreeMap<String, String>>,
    facade: QueryFacade<C>,
}

impl<C: PersistenceContext> Session<C> {
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn context(&self) -> &C {
        self.facade.context()
    }

    /// Runs `work` in one transaction. Entity names inside `work` are not
    /// resolved; use [`Session::resolve`] for the stored names.
    pub fn transaction<T>(&mut self, work: impl FnOnce(&mut QueryFacade<C>) -> Result<T>) -> Result<T> {
        in_transaction(&mut self.facade, work)
    }

    pub fn resolve(&self, name: &str) -> Result<&str> {
        resolve(&self.entities, name)
    }

    fn stored_name(&self, name: &str) -> Result<String> {
        self.resolve(name).map(str::to_string)
    }
}

impl<C: PersistenceContext> Facade for Session<C> {
    fn single_record(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
        params: &Params,
    ) -> Result<Record> {
        self.facade.single_record(strategy, text, params)
    }

    fn list_records(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
        params: &Params,
        start: Option<usize>,
        max: Option<usize>,
    ) -> Result<Vec<Record>> {
        self.facade.list_records(strategy, text, params, start, max)
    }

    fn execute(&mut self, strategy: QueryStrategy, text: &str, params: &Params) -> Result<usize> {
        self.transaction(|facade| facade.execute(strategy, text, params))
    }

    fn create_record(&mut self, entity: &str, record: Record) -> Result<Record> {
        let entity = self.stored_name(entity)?;
        self.transaction(|facade| facade.create_record(&entity, record))
    }

    fn read_record(&mut self, entity: &str, key: &Value) -> Result<Option<Record>> {
        let entity = self.stored_name(entity)?;
        self.facade.read_record(&entity, key)
    }

    fn update_record(&mut self, entity: &str, record: Record) -> Result<Record> {
        let entity = self.stored_name(entity)?;
        self.transaction(|facade| facade.update_record(&entity, record))
    }

    fn delete_record(&mut self, entity: &str, key: &Value) -> Result<bool> {
        let entity = self.stored_name(entity)?;
        self.transaction(|facade| facade.delete_record(&entity, key))
    }
}
