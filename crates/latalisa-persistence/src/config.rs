//! Persistence unit configuration.
//!
//! A [`UnitConfig`] describes one persistence unit: its name, provider,
//! transaction type, managed entities and free-form properties. It can be
//! built fluently or loaded from TOML:
//!
//! ```toml
//! name = "sales"
//! provider = "memory"
//! transaction_type = "resource-local"
//! managed_entities = ["Customer", "Order"]
//!
//! [properties]
//! generate_statistics = "true"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::ContextFactory;
use crate::error::{PersistenceError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionType {
    /// Transactions are managed by the context itself.
    #[default]
    ResourceLocal,
    /// Transactions are managed by an external coordinator.
    Jta,
}

/// Configuration for a persistence unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub managed_entities: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl UnitConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    /// Replaces the managed entity names.
    pub fn managed_entities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.managed_entities = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn add_managed_entities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.managed_entities.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn clear_managed_entities(mut self) -> Self {
        self.managed_entities.clear();
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replaces every property.
    pub fn properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    pub fn add_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn clear_properties(mut self) -> Self {
        self.properties.clear();
        self
    }

    /// True when only the listed entities belong to the unit.
    pub fn excludes_unlisted(&self) -> bool {
        !self.managed_entities.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PersistenceError::Config("unit name must not be empty".into()));
        }
        Ok(())
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Validates the configuration and hands it to `lookup`.
    pub fn build<L: FactoryLookup>(&self, lookup: &L) -> Result<L::Factory> {
        self.validate()?;
        lookup.create_factory(self)
    }
}

/// Creates context factories from unit configurations.
pub trait FactoryLookup: Send + Sync {
    type Factory: ContextFactory;

    fn create_factory(&self, unit: &UnitConfig) -> Result<Self::Factory>;
}
