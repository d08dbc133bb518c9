//! End-to-end scenarios through the in-memory backend.

use std::sync::{Arc, OnceLock, Weak};

use latalisa_builders::Builder;
use latalisa_persistence::{
    in_transaction, row_matches, select_all, select_by, Entity, Facade, ForeignKeyBuilder,
    ForeignKeyRegistry, MemoryFactory, MemoryLookup, MultiSource, Params, PersistenceContext,
    PersistenceError, QueryFacade, QueryHandle, QueryOutput, QueryStrategy, Record, Result, Tables,
    Transactional, TxEvent, Value,
};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Task {
    id: Option<i64>,
    title: String,
    done: bool,
}

impl Entity for Task {
    const NAME: &'static str = "Task";
}

fn task(title: &str) -> Task {
    Task {
        id: None,
        title: title.to_string(),
        done: false,
    }
}

fn complete_by_title() -> latalisa_persistence::QueryHandler {
    Arc::new(|tables: &mut Tables, params: &Params| -> Result<QueryOutput> {
        let mut count = 0;
        for row in tables.rows_mut("Task")? {
            if row_matches(row, params, &["title"]) {
                row["done"] = json!(true);
                count += 1;
            }
        }
        Ok(QueryOutput::Updated(count))
    })
}

fn factory() -> MemoryFactory {
    MemoryFactory::new()
        .table("Task", "id")
        .handler(QueryStrategy::Default, "select t from Task t", select_all("Task"))
        .handler(QueryStrategy::Named, "Task.byTitle", select_by("Task", &["title"]))
        .handler(QueryStrategy::Named, "Task.complete", complete_by_title())
        .handler(
            QueryStrategy::Native,
            "delete from task where done",
            Arc::new(|tables: &mut Tables, _: &Params| -> Result<QueryOutput> {
                let removed = tables.delete_where("Task", |row| row["done"] == json!(true))?;
                Ok(QueryOutput::Updated(removed))
            }),
        )
}

#[test]
fn crud_round_trip() {
    init_tracing();
    let mut facade = QueryFacade::new(factory().open_context());

    let created = facade.create(&task("write docs")).unwrap();
    assert_eq!(created.id, Some(1));

    let mut loaded: Task = facade.read(1).unwrap().unwrap();
    loaded.done = true;
    facade.update(&loaded).unwrap();
    assert_eq!(facade.read::<Task>(1).unwrap(), Some(loaded));

    assert!(facade.delete::<Task>(1).unwrap());
    assert!(!facade.delete::<Task>(1).unwrap());
    assert_eq!(facade.read::<Task>(1).unwrap(), None);
}

#[test]
fn reads_and_lists_clear_the_context() {
    let mut facade = QueryFacade::new(factory().open_context());
    facade.read::<Task>(1).unwrap();
    facade
        .list::<Task>(QueryStrategy::Default, "select t from Task t", &Params::new(), None, None)
        .unwrap();
    assert_eq!(facade.context().clear_count(), 2);
}

#[test]
fn builder_find_list_and_single() {
    let mut facade = QueryFacade::new(factory().open_context());
    for title in ["a", "b", "b"] {
        facade.create(&task(title)).unwrap();
    }

    let mut query = facade
        .query(QueryStrategy::Named, "Task.byTitle")
        .set_param("title", "a");
    let only: Task = query.single().unwrap();
    assert_eq!(only.title, "a");

    let mut query = query.set_param("title", "b");
    assert_eq!(query.list::<Task>().unwrap().len(), 2);
    assert_eq!(query.find::<Task>().unwrap().map(|t| t.id), Some(Some(2)));
    assert!(matches!(query.single::<Task>(), Err(PersistenceError::NonUniqueResult(2))));

    let mut query = query.set_param("title", "zzz");
    assert_eq!(query.find::<Task>().unwrap(), None);
    assert!(matches!(query.single::<Task>(), Err(PersistenceError::NoResult)));
    assert!(query.find_with(|t: Option<Task>| t.is_none()).unwrap());
}

#[test]
fn builder_keeps_params_and_pagination() {
    let mut facade = QueryFacade::new(factory().open_context());
    for title in ["a", "b", "c", "d"] {
        facade.create(&task(title)).unwrap();
    }

    let mut query = facade
        .query(QueryStrategy::Default, "select t from Task t")
        .set_start_result(1)
        .set_max_results(2);
    let titles = query
        .list_with(|tasks: Vec<Task>| tasks.into_iter().map(|t| t.title).collect::<Vec<_>>())
        .unwrap();
    assert_eq!(titles, vec!["b", "c"]);
    assert_eq!(query.list::<Task>().unwrap().len(), 2);

    let mut query = query.clear_max_results().clear_start_result();
    assert_eq!(query.list::<Task>().unwrap().len(), 4);
    assert_eq!(query.start_result(), None);
}

#[test]
fn builder_param_editing() {
    let mut facade = QueryFacade::new(factory().open_context());
    let query = facade
        .query(QueryStrategy::Named, "Task.byTitle")
        .set_param("a", 1)
        .add_params([("b", Value::from(2)), ("c", Value::Null)])
        .remove_param("a");
    assert_eq!(query.params().keys().collect::<Vec<_>>(), vec!["b", "c"]);
    assert!(query.clear_params().params().is_empty());
}

#[test]
fn named_and_native_updates() {
    let mut facade = Transactional::new(factory().open_context());
    for title in ["a", "b"] {
        facade.create(&task(title)).unwrap();
    }

    let updated = facade
        .query(QueryStrategy::Named, "Task.complete")
        .set_param("title", "a")
        .execute()
        .unwrap();
    assert_eq!(updated, 1);

    let removed = facade
        .execute(QueryStrategy::Native, "delete from task where done", &Params::new())
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(
        facade.context().journal().iter().filter(|e| **e == TxEvent::Commit).count(),
        4
    );
}

#[test]
fn transactional_rolls_back_and_keeps_the_original_error() {
    let factory = factory();
    let mut facade = Transactional::new(factory.open_context());
    facade.create(&task("a")).unwrap();

    let err = facade
        .transaction(|inner| {
            inner.create(&task("b"))?;
            inner.create(&Task {
                id: Some(1),
                title: "dup".into(),
                done: false,
            })
        })
        .unwrap_err();

    assert!(matches!(err, PersistenceError::Backend(_)));
    assert_eq!(factory.snapshot().len("Task").unwrap(), 1);
    assert_eq!(
        facade.context().journal(),
        &[TxEvent::Begin, TxEvent::Commit, TxEvent::Begin, TxEvent::Rollback]
    );
}

/// Context whose commit and rollback can be made to fail.
#[derive(Default)]
struct FaultyContext {
    log: Vec<&'static str>,
    active: bool,
    fail_commit: bool,
    fail_rollback: bool,
}

impl PersistenceContext for FaultyContext {
    fn create_query(
        &mut self,
        strategy: QueryStrategy,
        text: &str,
    ) -> Result<Box<dyn QueryHandle + '_>> {
        Err(PersistenceError::UnknownQuery {
            strategy,
            text: text.to_string(),
        })
    }

    fn persist(&mut self, _: &str, record: Record) -> Result<Record> {
        Ok(record)
    }

    fn find(&mut self, _: &str, _: &Value) -> Result<Option<Record>> {
        Ok(None)
    }

    fn merge(&mut self, _: &str, record: Record) -> Result<Record> {
        Ok(record)
    }

    fn remove(&mut self, _: &str, _: &Value) -> Result<bool> {
        Ok(false)
    }

    fn clear(&mut self) {}

    fn begin(&mut self) -> Result<()> {
        if self.active {
            return Err(PersistenceError::transaction("already active"));
        }
        self.active = true;
        self.log.push("begin");
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.fail_commit {
            self.log.push("commit-failed");
            return Err(PersistenceError::transaction("commit refused"));
        }
        self.active = false;
        self.log.push("commit");
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.active = false;
        if self.fail_rollback {
            self.log.push("rollback-failed");
            return Err(PersistenceError::transaction("rollback refused"));
        }
        self.log.push("rollback");
        Ok(())
    }
}

#[test]
fn failed_commit_rolls_back_and_leaves_the_facade_usable() {
    init_tracing();
    let mut facade = QueryFacade::new(FaultyContext {
        fail_commit: true,
        ..FaultyContext::default()
    });

    let first = in_transaction(&mut facade, |_| Ok(1));
    assert!(matches!(first, Err(PersistenceError::Transaction(ref msg)) if msg == "commit refused"));

    facade.context_mut().fail_commit = false;
    let second = in_transaction(&mut facade, |_| Ok(2)).unwrap();
    assert_eq!(second, 2);
    assert_eq!(
        facade.context().log,
        vec!["begin", "commit-failed", "rollback", "begin", "commit"]
    );
}

#[test]
fn failed_rollback_keeps_the_work_error() {
    init_tracing();
    let mut facade = QueryFacade::new(FaultyContext {
        fail_rollback: true,
        ..FaultyContext::default()
    });

    let err = in_transaction(&mut facade, |_| -> Result<()> { Err(PersistenceError::NoResult) })
        .unwrap_err();
    assert!(matches!(err, PersistenceError::NoResult));
    assert_eq!(facade.context().log, vec!["begin", "rollback-failed"]);
}

#[test]
fn unknown_query_is_reported() {
    let mut facade = QueryFacade::new(factory().open_context());
    let err = facade.query(QueryStrategy::Named, "missing").execute().unwrap_err();
    assert_eq!(err.to_string(), "unknown named query: missing");
}

#[test]
fn multi_source_caches_factories_per_unit() {
    init_tracing();
    let source = MultiSource::new(MemoryLookup::new(|unit| {
        assert_eq!(unit.managed_entities, vec!["Task"]);
        factory()
    }))
    .map_entity("Todo", "Task")
    .entity("Task");

    let mut first = source.session("main").unwrap();
    first.create_record("Todo", json!({"title": "a", "done": false})).unwrap();
    let mut second = source.session("main").unwrap();
    assert!(second.read::<Task>(1).unwrap().is_some());

    let mut other = source.session("archive").unwrap();
    assert!(other.read::<Task>(1).unwrap().is_none());

    assert_eq!(source.factory_count(), 2);
    assert_eq!(second.unit(), "main");
    assert_eq!(source.unit_config("x").properties["generate_statistics"], "true");
}

#[test]
fn lookup_may_call_back_into_its_source() {
    let handle: Arc<OnceLock<Weak<MultiSource<MemoryLookup>>>> = Arc::new(OnceLock::new());
    let seen = Arc::clone(&handle);
    let source = Arc::new(
        MultiSource::new(MemoryLookup::new(move |_| {
            if let Some(source) = seen.get().and_then(Weak::upgrade) {
                assert_eq!(source.factory_count(), 0);
            }
            factory()
        }))
        .entity("Task"),
    );
    handle.set(Arc::downgrade(&source)).unwrap();

    source.session("main").unwrap();
    source.session("main").unwrap();
    assert_eq!(source.factory_count(), 1);
}

#[test]
fn multi_source_rejects_unknown_entities_and_units() {
    let source = MultiSource::new(MemoryLookup::new(|_| factory())).entity("Task");
    assert!(matches!(source.session(""), Err(PersistenceError::UnitNotDefined)));

    let mut session = source.session("main").unwrap();
    assert!(matches!(
        session.read_record("Ghost", &Value::Int(1)),
        Err(PersistenceError::UnknownEntity(name)) if name == "Ghost"
    ));
    assert!(session.context().journal().is_empty());
}

#[test]
fn session_mutations_are_transactional() {
    let source = MultiSource::new(MemoryLookup::new(|_| factory())).entity("Task");
    let mut session = source.session("main").unwrap();
    session.create(&task("a")).unwrap();
    session
        .transaction(|facade| {
            facade.create(&task("b"))?;
            facade.create(&task("c"))
        })
        .unwrap();
    assert_eq!(
        session.context().journal(),
        &[TxEvent::Begin, TxEvent::Commit, TxEvent::Begin, TxEvent::Commit]
    );
}

#[test]
fn foreign_keys_run_as_one_native_statement() {
    let registry = ForeignKeyRegistry::new();
    let keys = ForeignKeyBuilder::new()
        .add(registry.declare("fk_task_owner", "task", "owner_id", "owner", "id").unwrap());
    let script = keys.build();

    let factory = factory().handler(
        QueryStrategy::Native,
        script,
        Arc::new(|_: &mut Tables, _: &Params| -> Result<QueryOutput> { Ok(QueryOutput::Updated(0)) }),
    );
    let mut facade = Transactional::new(factory.open_context());
    assert_eq!(keys.apply(&mut facade).unwrap(), 0);
    assert_eq!(facade.context().journal(), &[TxEvent::Begin, TxEvent::Commit]);
    assert_eq!(ForeignKeyBuilder::new().apply(&mut facade).unwrap(), 0);
}
