//! CNPJ (Cadastro Nacional da Pessoa Jurídica) check-digit validation.
//!
//! A CNPJ has twelve base digits followed by two check digits. Weights cycle
//! from 5 (first digit) or 6 (second digit) down to 2 and wrap back to 9.

use super::{check_digit, digits, repeated_prefix};

const LENGTH: usize = 14;
const BASE: usize = 12;

/// Returns `true` if `value` is a CNPJ with correct check digits.
///
/// ```
/// use latalisa_core::validation::cnpj;
///
/// assert!(cnpj::is_valid("11.444.777/0001-61"));
/// assert!(!cnpj::is_valid("11.444.777/0001-62"));
/// ```
pub fn is_valid(value: &str) -> bool {
    is_valid_digits(&digits(value))
}

pub(crate) fn is_valid_digits(digits: &[u8]) -> bool {
    digits.len() == LENGTH
        && !repeated_prefix(digits, BASE)
        && compute(&digits[..BASE]) == [digits[12], digits[13]]
}

/// Computes the two check digits for the first twelve digits of `value`.
pub fn check_digits(value: &str) -> Option<[u8; 2]> {
    let digits = digits(value);
    (digits.len() >= BASE).then(|| compute(&digits[..BASE]))
}

fn next_weight(weight: u32) -> u32 {
    if weight == 2 {
        9
    } else {
        weight - 1
    }
}

fn compute(base: &[u8]) -> [u8; 2] {
    let (mut first, mut second) = (0u32, 0u32);
    let (mut w1, mut w2) = (5u32, 6u32);
    for &d in base {
        first += u32::from(d) * w1;
        second += u32::from(d) * w2;
        w1 = next_weight(w1);
        w2 = next_weight(w2);
    }
    let first = check_digit(first);
    let second = check_digit(second + u32::from(first) * 2);
    [first, second]
}
