//! # Latalisa Web - HTTP Filters and Interceptors
//!
//! Framework-neutral request filters and body interceptors built on two
//! small traits, [`HttpRequest`] and [`HttpResponse`]:
//!
//! - [`SecurityFilter`]: HSTS, frame, XSS and content-type headers for
//!   secure requests.
//! - [`BearerFilter`]: `Authorization: Bearer` extraction with a pluggable
//!   [`TokenVerifier`].
//! - [`require_gzip_content`], [`require_gzip_accept`], [`GzipReader`] and
//!   [`GzipWriter`]: gzip negotiation and compression.
//! - [`EncryptionInterceptor`]: RSA body encryption with keys passed as
//!   request properties.
//!
//! Filters answer with a [`Rejection`] carrying the status to respond with.
//!
//! ## Quick Start
//!
//! ```rust
//! use latalisa_web::{
//!     BearerFilter, HttpRequest, Rejection, Request, Response, SecurityConfig, SecurityFilter,
//!     Status, AUTHORIZATION,
//! };
//!
//! let security = SecurityFilter::new(SecurityConfig::default())?;
//! let bearer = BearerFilter::new(|_: &dyn HttpRequest, token: &str| {
//!     if token == "letmein" { Ok(()) } else { Err(Rejection::forbidden()) }
//! });
//!
//! let request = Request::new().secure(true).header(AUTHORIZATION, "Bearer letmein");
//! let mut response = Response::new();
//!
//! bearer.filter(&request)?;
//! assert!(security.apply(&request, &mut response));
//! assert_eq!(bearer.filter(&Request::new()).unwrap_err().status, Status::Unauthorized);
//! # Ok::<(), latalisa_web::WebError>(())
//! ```

mod bearer;
mod encryption;
mod error;
mod gzip;
mod http;
mod security;

pub use bearer::{bearer_token, BearerFilter, TokenVerifier, BEARER};
pub use encryption::{EncryptionInterceptor, PRIVATE_KEY, PUBLIC_KEY};
pub use error::{Rejection, Result, WebError};
pub use gzip::{require_gzip_accept, require_gzip_content, GzipReader, GzipWriter, GZIP};
pub use http::{
    Headers, HttpRequest, HttpResponse, Properties, Request, Response, Status, ACCEPT_ENCODING,
    AUTHORIZATION, CONTENT_ENCODING, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
pub use security::{
    SecurityConfig, SecurityFilter, XFrameOption, DEFAULT_MAX_AGE_SECONDS, PARAM_DISABLE_FILTER,
    PARAM_INCLUDE_SUB_DOMAINS, PARAM_MAX_AGE_SECONDS, PARAM_PRELOAD, PARAM_X_FRAME_OPTION,
};
