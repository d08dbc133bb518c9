//! # Latalisa Persistence - Query Facades Over a Pluggable Context
//!
//! This crate separates *how* a query runs from *what* query runs.
//!
//! - [`PersistenceContext`] and [`QueryHandle`] are the backend seam: an
//!   entity-manager-like unit of work and a resolved query.
//! - [`Facade`] runs queries and CRUD operations against a context;
//!   [`QueryFacade`] does it plainly and [`Transactional`] wraps each
//!   mutation in its own transaction.
//! - [`QueryBuilder`] accumulates parameters and pagination for one query
//!   and can be executed any number of times.
//! - [`MultiSource`] caches one factory per persistence unit and hands out
//!   explicit [`Session`] handles.
//!
//! Records travel as JSON values, so any `serde` type can be an [`Entity`].
//! [`MemoryContext`] is a complete in-memory backend.
//!
//! ## Quick Start
//!
//! ```rust
//! use latalisa_persistence::{
//!     select_by, Entity, Facade, MemoryFactory, QueryFacade, QueryStrategy,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize, PartialEq)]
//! struct Customer {
//!     id: Option<i64>,
//!     city: String,
//! }
//!
//! impl Entity for Customer {
//!     const NAME: &'static str = "Customer";
//! }
//!
//! let factory = MemoryFactory::new()
//!     .table("Customer", "id")
//!     .handler(QueryStrategy::Named, "Customer.byCity", select_by("Customer", &["city"]));
//! let mut facade = QueryFacade::new(factory.open_context());
//!
//! let saved = facade.create(&Customer { id: None, city: "Recife".into() })?;
//! assert_eq!(saved.id, Some(1));
//!
//! let found: Option<Customer> = facade
//!     .query(QueryStrategy::Named, "Customer.byCity")
//!     .set_param("city", "Recife")
//!     .find()?;
//! assert_eq!(found, Some(saved));
//! # Ok::<(), latalisa_persistence::PersistenceError>(())
//! ```

mod builder;
mod config;
mod context;
mod error;
mod facade;
mod foreign_key;
mod memory;
pub mod model;
mod multi;
mod script;
mod transaction;
mod value;

pub use builder::QueryBuilder;
pub use config::{FactoryLookup, TransactionType, UnitConfig};
pub use context::{ContextFactory, PersistenceContext, QueryHandle};
pub use error::{PersistenceError, Result};
pub use facade::{from_record, to_record, Entity, Facade, QueryFacade};
pub use foreign_key::{ForeignKey, ForeignKeyBuilder, ForeignKeyRegistry};
pub use memory::{
    row_matches, select_all, select_by, MemoryContext, MemoryFactory, MemoryLookup, QueryHandler,
    QueryOutput, Tables, TxEvent,
};
pub use multi::{MultiSource, Session, DEFAULT_PROPERTIES};
pub use script::{load_script, load_script_path};
pub use transaction::{in_transaction, Transactional};
pub use value::{Params, QueryStrategy, Record, Value, UTF8_BOM};
