//! Minimal HTTP abstractions the filters work against.
//!
//! Any server framework can adapt its request and response types to
//! [`HttpRequest`] and [`HttpResponse`]. [`Request`] and [`Response`] are
//! plain implementations for tests and simple servers.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
pub const STRICT_TRANSPORT_SECURITY: &str = "Strict-Transport-Security";
pub const X_FRAME_OPTIONS: &str = "X-Frame-Options";
pub const X_XSS_PROTECTION: &str = "X-XSS-Protection";
pub const X_CONTENT_TYPE_OPTIONS: &str = "X-Content-Type-Options";

/// Statuses a filter can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    BadRequest,
    Unauthorized,
    Forbidden,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::BadRequest => 400,
            Status::Unauthorized => 401,
            Status::Forbidden => 403,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Status::BadRequest => "Bad Request",
            Status::Unauthorized => "Unauthorized",
            Status::Forbidden => "Forbidden",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

// ============================================================================
// Headers
// ============================================================================

/// Header multimap with case-insensitive names.
///
/// Names keep the spelling of their first insertion; values keep insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// Appends a value, keeping any existing ones.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(index) => self.entries[index].1.push(value.into()),
            None => self.entries.push((name.to_string(), vec![value.into()])),
        }
    }

    /// Replaces every value of `name` with `value`.
    pub fn put_single(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(index) => self.entries[index].1 = vec![value.into()],
            None => self.entries.push((name.to_string(), vec![value.into()])),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(index) => &self.entries[index].1,
            None => &[],
        }
    }

    /// All values of `name` joined with commas, or `None` when absent.
    pub fn get_string(&self, name: &str) -> Option<String> {
        let values = self.get_all(name);
        (!values.is_empty()).then(|| values.join(","))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Vec<String> {
        self.position(name)
            .map(|index| self.entries.remove(index).1)
            .unwrap_or_default()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v.as_str())))
    }
}

// ============================================================================
// Properties
// ============================================================================

/// Typed values attached to a request by earlier processing stages.
#[derive(Default)]
pub struct Properties {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Box::new(value));
    }

    /// Returns the value when present and of type `T`.
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(|value| value.downcast_ref())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.values.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

// ============================================================================
// Request / response
// ============================================================================

pub trait HttpRequest {
    fn headers(&self) -> &Headers;

    /// True when the request arrived over a secure channel.
    fn is_secure(&self) -> bool;

    fn properties(&self) -> &Properties;
}

pub trait HttpResponse {
    fn headers(&self) -> &Headers;

    fn headers_mut(&mut self) -> &mut Headers;
}

#[derive(Debug, Default)]
pub struct Request {
    pub headers: Headers,
    pub secure: bool,
    pub properties: Properties,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    pub fn property<T: Any + Send + Sync>(mut self, name: &str, value: T) -> Self {
        self.properties.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

impl HttpRequest for Request {
    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn is_secure(&self) -> bool {
        self.secure
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Response {
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpResponse for Response {
    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }
}
