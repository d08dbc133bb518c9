//! Query strategies, parameter values and records.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;

/// Marks a content string that may begin with a UTF-8 byte order mark.
pub const UTF8_BOM: char = '\u{feff}';

/// How query text is resolved by the persistence context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum QueryStrategy {
    /// Ad hoc query in the context's query language.
    #[default]
    Default,
    /// Query registered under a name.
    Named,
    /// Query in the database's native dialect.
    Native,
}

impl QueryStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryStrategy::Default => "default",
            QueryStrategy::Named => "named",
            QueryStrategy::Native => "native",
        }
    }
}

impl fmt::Display for QueryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query parameter or primary key value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The JSON form used inside records.
    ///
    /// Timestamps use the same ISO-8601 text as serialized entity fields, so
    /// a parameter compares equal to the field it was taken from.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::from(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Text(s) => serde_json::Value::from(s.as_str()),
            Value::Bytes(b) => serde_json::Value::from(b.clone()),
            Value::Timestamp(t) => serde_json::Value::from(t.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        }
    }

    /// Converts a JSON scalar back into a value; arrays and objects are rejected.
    pub fn from_json(value: &serde_json::Value) -> Option<Value> {
        match value {
            serde_json::Value::Null => Some(Value::Null),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float)),
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Timestamp(t) => write!(f, "{t}"),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value.into())
            }
        })*
    };
}

value_from!(
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Text,
    &str => Text,
    Vec<u8> => Bytes,
    NaiveDateTime => Timestamp,
);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Named query parameters, ordered by name.
pub type Params = BTreeMap<String, Value>;

/// A row or entity as exchanged with the persistence context.
pub type Record = serde_json::Value;
