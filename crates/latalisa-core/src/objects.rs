//! Object encoding, emptiness and equality helpers.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::error::Error;
use std::io::{BufRead, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

// ============================================================================
// Encoding
// ============================================================================

/// Encodes a value as JSON bytes.
pub fn encode_object<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Decodes a value from JSON bytes.
pub fn decode_object<T: DeserializeOwned>(value: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(value)?)
}

/// Writes each object as one JSON line and flushes after each.
pub fn write_objects<W, T>(mut writer: W, objects: &[T]) -> Result<()>
where
    W: Write,
    T: Serialize,
{
    for object in objects {
        serde_json::to_writer(&mut writer, object)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    Ok(())
}

/// Reads JSON lines until end of input; blank lines are skipped.
pub fn read_objects<R, T>(reader: R) -> Result<Vec<T>>
where
    R: BufRead,
    T: DeserializeOwned,
{
    let mut objects = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        objects.push(serde_json::from_str(&line)?);
    }
    Ok(objects)
}

// ============================================================================
// Emptiness
// ============================================================================

/// Values that have a notion of being empty.
///
/// Numbers are empty when zero; `Option`s are empty when `None` or when the
/// contained value is empty.
pub trait IsEmpty {
    fn is_empty_value(&self) -> bool;
}

impl IsEmpty for str {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl IsEmpty for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmpty for [T] {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> IsEmpty for HashMap<K, V, S> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T, S> IsEmpty for HashSet<T, S> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> IsEmpty for BTreeMap<K, V> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! numeric_is_empty {
    ($($ty:ty),*) => {
        $(impl IsEmpty for $ty {
            fn is_empty_value(&self) -> bool {
                *self == (0 as $ty)
            }
        })*
    };
}

numeric_is_empty!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl<T: IsEmpty + ?Sized> IsEmpty for &T {
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl<T: IsEmpty> IsEmpty for Option<T> {
    fn is_empty_value(&self) -> bool {
        self.as_ref().map_or(true, IsEmpty::is_empty_value)
    }
}

/// Returns `true` if any value is empty.
pub fn any_empty<T: IsEmpty>(values: &[T]) -> bool {
    values.iter().any(IsEmpty::is_empty_value)
}

/// Returns `true` if every value is empty (vacuously true for no values).
pub fn all_empty<T: IsEmpty>(values: &[T]) -> bool {
    values.iter().all(IsEmpty::is_empty_value)
}

// ============================================================================
// Equality
// ============================================================================

/// Returns `true` if `base` is present and equals any present value.
pub fn any_equals<T: PartialEq>(base: Option<&T>, values: &[Option<T>]) -> bool {
    base.is_some_and(|base| values.iter().flatten().any(|value| value == base))
}

/// Returns `true` if `base` is present and every value is present and equal to it.
pub fn all_equals<T: PartialEq>(base: Option<&T>, values: &[Option<T>]) -> bool {
    base.is_some_and(|base| values.iter().all(|value| value.as_ref() == Some(base)))
}

/// Follows `source()` links to the innermost error.
pub fn root_cause<'a>(error: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current
}
