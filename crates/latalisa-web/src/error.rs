//! Error types for HTTP filters and interceptors.

use std::fmt;
use std::io;

use latalisa_core::CoreError;

use crate::http::Status;

/// A request stopped by a filter, with the status to answer it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: Status,
    pub message: Option<String>,
}

impl Rejection {
    pub fn new(status: Status) -> Self {
        Self { status, message: None }
    }

    pub fn with_message(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(Status::BadRequest, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(Status::Unauthorized)
    }

    pub fn forbidden() -> Self {
        Self::new(Status::Forbidden)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Rejection {}

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("request rejected with {0}")]
    Rejected(#[from] Rejection),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl WebError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The status to answer with, when this error is a rejection.
    pub fn status(&self) -> Option<Status> {
        match self {
            WebError::Rejected(rejection) => Some(rejection.status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WebError>;
