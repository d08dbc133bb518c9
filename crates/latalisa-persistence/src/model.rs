//! Capability traits for entity types.
//!
//! Each trait exposes one property and, where it makes sense, a
//! [`Comparator`] ordering values by it. Absent properties sort first.

use std::any::type_name;
use std::fmt;

use latalisa_builders::{Builder, Comparator, ComparatorBuilder};

use crate::error::{PersistenceError, Result};

pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_CODE: &str = "code";
pub const FIELD_ACTIVE: &str = "active";

/// Maximum length of a [`Named`] name.
pub const NAME_MAX_LEN: usize = 255;

/// A value with a primary key.
pub trait Identifiable {
    type Id: Ord + Clone + 'static;

    fn id(&self) -> Option<&Self::Id>;

    /// Read-only unless overridden.
    fn set_id(&mut self, _id: Self::Id) -> Result<()> {
        Err(PersistenceError::ReadOnly(FIELD_ID))
    }

    fn by_id() -> Comparator<Self>
    where
        Self: Sized + 'static,
    {
        ComparatorBuilder::new()
            .add(|value: &Self| value.id().cloned())
            .build()
    }
}

pub trait Named {
    fn name(&self) -> Option<&str>;

    fn set_name(&mut self, _name: &str) -> Result<()> {
        Err(PersistenceError::ReadOnly(FIELD_NAME))
    }

    fn by_name() -> Comparator<Self>
    where
        Self: Sized + 'static,
    {
        ComparatorBuilder::new()
            .add(|value: &Self| value.name().map(str::to_owned))
            .build()
    }

    fn by_name_ignore_case() -> Comparator<Self>
    where
        Self: Sized + 'static,
    {
        ComparatorBuilder::new()
            .add(|value: &Self| value.name().map(str::to_lowercase))
            .build()
    }
}

pub trait Coded {
    type Code: Ord + Clone + 'static;

    fn code(&self) -> Option<&Self::Code>;

    fn set_code(&mut self, _code: Self::Code) -> Result<()> {
        Err(PersistenceError::ReadOnly(FIELD_CODE))
    }

    fn by_code() -> Comparator<Self>
    where
        Self: Sized + 'static,
    {
        ComparatorBuilder::new()
            .add(|value: &Self| value.code().cloned())
            .build()
    }
}

pub trait Activatable {
    fn active(&self) -> Option<bool>;

    fn set_active(&mut self, _active: Option<bool>) -> Result<()> {
        Err(PersistenceError::ReadOnly(FIELD_ACTIVE))
    }

    /// Only an explicit `true` counts as active.
    fn is_active(&self) -> bool {
        self.active() == Some(true)
    }

    fn by_active() -> Comparator<Self>
    where
        Self: Sized + 'static,
    {
        ComparatorBuilder::new().add(|value: &Self| value.active()).build()
    }
}

/// Copies state from another value.
pub trait Copyable<T> {
    fn copy_from(&mut self, source: &T);

    /// Creates a default value and copies `source` into it.
    fn copied_from(source: &T) -> Self
    where
        Self: Default + Sized,
    {
        let mut target = Self::default();
        target.copy_from(source);
        target
    }
}

/// A value identified by a primary key, displayed as `Type [id=..]`.
pub trait PrimaryKeyId {
    type Id: fmt::Display;

    fn primary_key(&self) -> Option<&Self::Id>;

    fn type_label(&self) -> &'static str {
        let full = type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }

    fn describe(&self) -> String {
        match self.primary_key() {
            Some(id) => format!("{} [id={id}]", self.type_label()),
            None => format!("{} [id=null]", self.type_label()),
        }
    }
}
