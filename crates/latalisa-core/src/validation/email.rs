//! E-mail address validation.
//!
//! Accepts a bare address (`jose@teste.com`) or an address wrapped in angle
//! brackets after a display name (`José <jose@teste.com>`).

use once_cell::sync::Lazy;
use regex::Regex;

const ATOM: &str = r"[a-z0-9!#$%&'*+/=?^_`{|}~-]";

static ADDRESS: Lazy<Regex> = Lazy::new(|| {
    let domain = format!(r"{ATOM}+(\.{ATOM}+)+");
    let ip_domain = r"\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\]";
    let pattern = format!(r"(?i)^{ATOM}+(\.{ATOM}+)*@({domain}|{ip_domain})$");
    Regex::new(&pattern).expect("e-mail pattern compiles")
});

static NAMED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^<>]*?)\s*<([^<>]+)>\s*$").expect("named address pattern compiles")
});

/// Returns the address part of `value`, if it has a valid e-mail shape.
///
/// ```
/// use latalisa_core::validation::email;
///
/// assert_eq!(email::address("José <jose@teste.com>"), Some("jose@teste.com"));
/// assert_eq!(email::address("jose@teste.com"), Some("jose@teste.com"));
/// assert_eq!(email::address("joseteste.com"), None);
/// ```
pub fn address(value: &str) -> Option<&str> {
    let candidate = match NAMED.captures(value) {
        Some(captures) => captures.get(2)?.as_str().trim(),
        None => value.trim(),
    };
    ADDRESS.is_match(candidate).then_some(candidate)
}

/// Returns `true` if `value` contains a well-formed e-mail address.
pub fn is_valid(value: &str) -> bool {
    address(value).is_some()
}
