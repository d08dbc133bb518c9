//! Foreign key declarations and the DDL that creates them.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::{Mutex, PoisonError};

use latalisa_builders::Builder;
use tracing::info;

use crate::error::{PersistenceError, Result};
use crate::facade::Facade;
use crate::value::{Params, QueryStrategy};

/// A named foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForeignKey {
    pub name: String,
    pub table: String,
    pub fields: String,
    pub foreign_table: String,
    pub foreign_fields: String,
}

impl ForeignKey {
    /// The `alter table` statement adding this constraint.
    pub fn ddl(&self) -> String {
        format!(
            "alter table {} add constraint if not exists {} foreign key({}) references {}({});",
            self.table, self.name, self.fields, self.foreign_table, self.foreign_fields
        )
    }
}

impl fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ddl())
    }
}

/// Hands out foreign keys with unique, non-empty names.
#[derive(Debug, Default)]
pub struct ForeignKeyRegistry {
    names: Mutex<HashSet<String>>,
}

impl ForeignKeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a foreign key, rejecting empty or already declared names.
    pub fn declare(
        &self,
        name: &str,
        table: &str,
        fields: &str,
        foreign_table: &str,
        foreign_fields: &str,
    ) -> Result<ForeignKey> {
        if name.trim().is_empty() {
            return Err(PersistenceError::EmptyName);
        }
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        if !names.insert(name.to_string()) {
            return Err(PersistenceError::DuplicateName(name.to_string()));
        }
        Ok(ForeignKey {
            name: name.to_string(),
            table: table.to_string(),
            fields: fields.to_string(),
            foreign_table: foreign_table.to_string(),
            foreign_fields: foreign_fields.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collects foreign keys and builds one script creating all of them.
#[derive(Debug, Clone, Default)]
pub struct ForeignKeyBuilder {
    keys: BTreeSet<ForeignKey>,
}

impl ForeignKeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, key: ForeignKey) -> Self {
        self.keys.insert(key);
        self
    }

    pub fn add_all(mut self, keys: impl IntoIterator<Item = ForeignKey>) -> Self {
        self.keys.extend(keys);
        self
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Runs the script as a native statement through `facade`.
    pub fn apply<F: Facade>(&self, facade: &mut F) -> Result<usize> {
        if self.keys.is_empty() {
            return Ok(0);
        }
        let script = self.build();
        let affected = facade.execute(QueryStrategy::Native, &script, &Params::new())?;
        info!(keys = self.keys.len(), "foreign keys applied");
        Ok(affected)
    }
}

impl Builder for ForeignKeyBuilder {
    type Output = String;

    /// Statements sorted, one per line.
    fn build(&self) -> String {
        let mut statements: Vec<String> = self.keys.iter().map(ForeignKey::ddl).collect();
        statements.sort();
        statements.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registry_rejects_empty_and_duplicate_names() {
        let registry = ForeignKeyRegistry::new();
        assert!(matches!(
            registry.declare(" ", "a", "b", "c", "d"),
            Err(PersistenceError::EmptyName)
        ));
        registry.declare("fk_order_customer", "orders", "customer_id", "customer", "id").unwrap();
        assert!(matches!(
            registry.declare("fk_order_customer", "x", "y", "z", "w"),
            Err(PersistenceError::DuplicateName(name)) if name == "fk_order_customer"
        ));
        assert!(registry.contains("fk_order_customer"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn builds_sorted_script() {
        let registry = ForeignKeyRegistry::new();
        let builder = ForeignKeyBuilder::new()
            .add(registry.declare("fk_b", "orders", "customer_id", "customer", "id").unwrap())
            .add(registry.declare("fk_a", "items", "order_id", "orders", "id").unwrap());

        assert_eq!(
            builder.build(),
            "alter table items add constraint if not exists fk_a foreign key(order_id) references orders(id);\n\
             alter table orders add constraint if not exists fk_b foreign key(customer_id) references customer(id);"
        );
    }
}
