//! Error types for the core utilities.

use std::io;

/// Errors raised by codecs, crypto helpers, formatting and I/O helpers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input was not valid hexadecimal.
    #[error("invalid hex input: {0}")]
    Hex(String),

    /// Input was not valid base64.
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes were not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression failed to compile.
    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    /// Ciphertext could not be unpadded (wrong key or corrupt data).
    #[error("decryption failed: invalid padding")]
    Padding,

    /// RSA operation failed.
    #[error("RSA error: {0}")]
    Rsa(#[from] rsa::Error),

    /// A private key could not be encoded or decoded.
    #[error("private key encoding error: {0}")]
    PrivateKey(#[from] rsa::pkcs8::Error),

    /// A public key could not be encoded or decoded.
    #[error("public key encoding error: {0}")]
    PublicKey(#[from] rsa::pkcs8::spki::Error),

    /// A date or number pattern is not supported.
    #[error("unsupported pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    /// A value could not be formatted with a pattern.
    #[error("could not format value with pattern '{0}'")]
    Format(String),

    /// Text could not be parsed.
    #[error("could not parse '{input}': {reason}")]
    Parse { input: String, reason: String },
}

impl CoreError {
    /// Create a pattern error.
    pub fn pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, CoreError>;
