//! Combined CPF-or-CNPJ validation.

use super::{cnpj, cpf, digits};

/// Returns `true` if `value` is a valid CPF (11 digits) or CNPJ (14 digits).
pub fn is_valid(value: &str) -> bool {
    let digits = digits(value);
    match digits.len() {
        11 => cpf::is_valid(value),
        14 => cnpj::is_valid_digits(&digits),
        _ => false,
    }
}
