//! Boolean validators for Brazilian registry numbers, e-mail addresses and
//! password strength.
//!
//! Each rule is available as a free `is_valid` function and as a unit type
//! implementing [`Validator`], which adds the optional-field semantics used
//! by form and entity validation: an absent or empty value passes unless the
//! field is required.
//!
//! ```
//! use latalisa_core::validation::{Cpf, Validator};
//!
//! assert!(Cpf.is_valid("111.444.777-35"));
//! assert!(Cpf.validate(None, false));
//! assert!(!Cpf.validate(Some(""), true));
//! ```

pub mod cnpj;
pub mod cpf;
pub mod cpf_cnpj;
pub mod email;
pub mod password;

/// A validation rule over text.
pub trait Validator {
    /// Returns `true` if `value` satisfies the rule.
    fn is_valid(&self, value: &str) -> bool;

    /// Validates an optional field.
    ///
    /// `None` and empty strings pass when `required` is `false`; otherwise the
    /// value must satisfy [`is_valid`](Validator::is_valid).
    fn validate(&self, value: Option<&str>, required: bool) -> bool {
        match value {
            None | Some("") if !required => true,
            None => false,
            Some(value) => self.is_valid(value),
        }
    }
}

/// CPF rule (individual taxpayer number).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cpf;

/// CNPJ rule (corporate taxpayer number).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cnpj;

/// Accepts either a valid CPF or a valid CNPJ, chosen by digit count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpfCnpj;

/// E-mail address rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmailAddress;

/// Password strength rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrongPassword;

impl Validator for Cpf {
    fn is_valid(&self, value: &str) -> bool {
        cpf::is_valid(value)
    }
}

impl Validator for Cnpj {
    fn is_valid(&self, value: &str) -> bool {
        cnpj::is_valid(value)
    }
}

impl Validator for CpfCnpj {
    fn is_valid(&self, value: &str) -> bool {
        cpf_cnpj::is_valid(value)
    }
}

impl Validator for EmailAddress {
    fn is_valid(&self, value: &str) -> bool {
        email::is_valid(value)
    }
}

impl Validator for StrongPassword {
    fn is_valid(&self, value: &str) -> bool {
        password::is_strong(value)
    }
}

/// Keeps only the ASCII digits of `value`.
pub(crate) fn digits(value: &str) -> Vec<u8> {
    value
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

/// Returns `true` when the first `prefix` digits are all the same.
pub(crate) fn repeated_prefix(digits: &[u8], prefix: usize) -> bool {
    digits.len() >= prefix && digits[..prefix].iter().all(|&d| d == digits[0])
}

/// Maps a weighted sum to a check digit: remainders 0 and 1 give 0.
pub(crate) fn check_digit(sum: u32) -> u8 {
    match sum % 11 {
        0 | 1 => 0,
        rest => (11 - rest) as u8,
    }
}
