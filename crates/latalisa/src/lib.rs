//! # Latalisa - Everyday Building Blocks
//!
//! One entry point for the latalisa crates:
//!
//! - [`builders`]: comparator chains and copy-on-build collection builders.
//! - [`core`]: CPF/CNPJ/e-mail validators, hex/Base64/URL/JSON codecs,
//!   digests, AES and RSA helpers, locale-aware formatting, file and thread
//!   utilities.
//! - [`persistence`] (feature `persistence`): query facades, a reusable
//!   query builder, transactional wrappers and per-unit sessions.
//! - [`web`] (feature `web`): security headers, bearer tokens, gzip and RSA
//!   body interceptors.
//!
//! ## Quick Start
//!
//! ```rust
//! use latalisa::builders::{Builder, ComparatorBuilder, ListBuilder};
//! use latalisa::core::validation::{Cpf, Validator};
//!
//! let documents = ListBuilder::new()
//!     .add("111.444.777-35")
//!     .add("000.000.000-00")
//!     .add("529.982.247-25")
//!     .build();
//!
//! let mut valid: Vec<&str> = documents.into_iter().filter(|d| Cpf.is_valid(d)).collect();
//! ComparatorBuilder::new().add(|d: &&str| d.to_string()).build().sort(&mut valid);
//! assert_eq!(valid, vec!["111.444.777-35", "529.982.247-25"]);
//! ```

pub use latalisa_builders as builders;
pub use latalisa_core as core;

#[cfg(feature = "persistence")]
pub use latalisa_persistence as persistence;

#[cfg(feature = "web")]
pub use latalisa_web as web;

pub use latalisa_builders::{Builder, Comparator, ComparatorBuilder, ListBuilder, MapBuilder, SetBuilder};
pub use latalisa_core::{CoreError, Validator};
