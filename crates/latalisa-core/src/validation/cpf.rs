//! CPF (Cadastro de Pessoas Físicas) check-digit validation.
//!
//! A CPF has nine base digits followed by two check digits. The first check
//! digit weights the base digits 10 down to 2; the second weights them 11
//! down to 3 and adds twice the first check digit.

use super::{check_digit, digits, repeated_prefix};

const LENGTH: usize = 11;
const BASE: usize = 9;

/// Returns `true` if `value` is a CPF with correct check digits.
///
/// Punctuation is ignored. Numbers whose base digits are all the same
/// (`000.000.000-00`, `111.111.111-11`, ...) are rejected.
///
/// ```
/// use latalisa_core::validation::cpf;
///
/// assert!(cpf::is_valid("111.444.777-35"));
/// assert!(!cpf::is_valid("111.444.777-36"));
/// ```
pub fn is_valid(value: &str) -> bool {
    let digits = digits(value);
    if digits.len() != LENGTH || repeated_prefix(&digits, BASE) {
        return false;
    }
    compute(&digits[..BASE]) == [digits[9], digits[10]]
}

/// Computes the two check digits for the first nine digits of `value`.
///
/// Returns `None` when fewer than nine digits are present.
pub fn check_digits(value: &str) -> Option<[u8; 2]> {
    let digits = digits(value);
    (digits.len() >= BASE).then(|| compute(&digits[..BASE]))
}

/// Appends the check digits to the first nine digits of `value`.
///
/// ```
/// use latalisa_core::validation::cpf;
///
/// assert_eq!(cpf::with_check_digits("111.444.777").as_deref(), Some("11144477735"));
/// ```
pub fn with_check_digits(value: &str) -> Option<String> {
    let digits = digits(value);
    if digits.len() < BASE {
        return None;
    }
    let [first, second] = compute(&digits[..BASE]);
    Some(
        digits[..BASE]
            .iter()
            .chain([first, second].iter())
            .map(|d| char::from(b'0' + d))
            .collect(),
    )
}

fn compute(base: &[u8]) -> [u8; 2] {
    let (mut first, mut second) = (0u32, 0u32);
    for (i, &d) in base.iter().enumerate() {
        let weight = (10 - i) as u32;
        first += u32::from(d) * weight;
        second += u32::from(d) * (weight + 1);
    }
    let first = check_digit(first);
    let second = check_digit(second + u32::from(first) * 2);
    [first, second]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_numbers() {
        assert!(is_valid("111.444.777-35"));
        assert!(is_valid("11144477735"));
        assert!(!is_valid("111.444.777-36"));
        assert!(!is_valid("111.444.777-45"));
    }

    #[test]
    fn wrong_length_is_invalid() {
        assert!(!is_valid(""));
        assert!(!is_valid("111.444.777-3"));
        assert!(!is_valid("111.444.777-355"));
    }

    #[test]
    fn repeated_digits_are_rejected() {
        for d in 0..=9u8 {
            let base: String = std::iter::repeat(char::from(b'0' + d)).take(9).collect();
            let full = with_check_digits(&base).unwrap();
            assert!(!is_valid(&full), "{full} should be rejected");
        }
    }

    #[test]
    fn check_digit_computation() {
        assert_eq!(check_digits("111444777"), Some([3, 5]));
        assert_eq!(check_digits("11144477"), None);
    }
}
