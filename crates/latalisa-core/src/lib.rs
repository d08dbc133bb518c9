//! General-purpose utilities: validators, codecs, crypto helpers and
//! locale-aware formatting.
//!
//! Modules are independent of each other and can be used à la carte:
//!
//! - [`validation`]: CPF, CNPJ, CPF-or-CNPJ, e-mail and password rules
//! - [`codec`]: hex, base64, URL form encoding and JSON
//! - [`crypto`]: SHA-256/MD5 digests, AES and RSA encryption
//! - [`format`]: number, currency and date formatting with an explicit
//!   [`FormatCache`](format::FormatCache)
//! - [`dates`]: instant ↔ Brazilian local time conversions
//! - [`text`], [`files`], [`objects`], [`thread`]: small helpers
//!
//! # Quick Start
//!
//! ```rust
//! use latalisa_core::{codec, crypto, validation};
//!
//! assert!(validation::cpf::is_valid("111.444.777-35"));
//! assert!(validation::cnpj::is_valid("11.444.777/0001-61"));
//!
//! let hex = codec::encode_hex(b"hi");
//! assert_eq!(codec::decode_hex(&hex).unwrap(), b"hi");
//!
//! let sealed = crypto::aes_encrypt_str("segredo", "chave");
//! assert_eq!(crypto::aes_decrypt_str(&sealed, "chave").unwrap(), "segredo");
//! ```
//!
//! Every fallible operation returns [`Result`] with a [`CoreError`]; the
//! validators return plain `bool`s.

pub mod codec;
pub mod crypto;
pub mod dates;
mod error;
pub mod files;
pub mod format;
pub mod objects;
pub mod text;
pub mod thread;
pub mod validation;

pub use error::{CoreError, Result};
pub use format::{FormatCache, Locale};
pub use validation::Validator;
