//! Error types for persistence operations.

use std::io;

use crate::value::QueryStrategy;

/// Errors raised by facades, sessions and persistence contexts.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// A single-result query matched nothing.
    #[error("query returned no result")]
    NoResult,

    /// A single-result query matched more than one row.
    #[error("query returned {0} results where one was expected")]
    NonUniqueResult(usize),

    /// The context does not know the query.
    #[error("unknown {strategy} query: {text}")]
    UnknownQuery {
        strategy: QueryStrategy,
        text: String,
    },

    /// The entity name is not mapped.
    #[error("unknown entity {0}")]
    UnknownEntity(String),

    /// A session was requested without naming a unit.
    #[error("persistence unit not defined")]
    UnitNotDefined,

    /// Unit configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Transaction state does not allow the operation.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A property cannot be changed on this value.
    #[error("property '{0}' is read-only")]
    ReadOnly(&'static str),

    /// A foreign key was declared without a name.
    #[error("foreign key name must not be empty")]
    EmptyName,

    /// A foreign key name was declared twice.
    #[error("duplicate foreign key name '{0}'")]
    DuplicateName(String),

    /// Records could not be mapped to or from entity types.
    #[error("mapping error: {0}")]
    Mapping(#[from] serde_json::Error),

    /// A TOML document could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration could not be serialized to TOML.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure reported by the persistence backend.
    #[error("persistence backend error: {0}")]
    Backend(String),
}

impl PersistenceError {
    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a transaction error.
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, PersistenceError>;
