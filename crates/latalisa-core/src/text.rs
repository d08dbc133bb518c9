//! Lenient parsing and small string predicates.

use std::io::Read;

use regex::Regex;

use crate::error::Result;

/// Parses a base-10 `i32`, returning `default` on any failure.
pub fn parse_i32_or(value: &str, default: i32) -> i32 {
    value.parse().unwrap_or(default)
}

/// Parses a base-10 `i64`, returning `default` on any failure.
pub fn parse_i64_or(value: &str, default: i64) -> i64 {
    value.parse().unwrap_or(default)
}

/// Parses an `f64`, returning `default` on any failure.
pub fn parse_f64_or(value: &str, default: f64) -> f64 {
    value.trim().parse().unwrap_or(default)
}

/// Returns `true` if `input` matches any of `patterns` in full.
///
/// Each pattern must match the whole input, not a substring.
///
/// ```
/// use latalisa_core::text::matches_any;
///
/// assert!(matches_any("12345", &[r"[a-z]+", r"\d+"]).unwrap());
/// assert!(!matches_any("a1", &[r"\d"]).unwrap());
/// ```
pub fn matches_any(input: &str, patterns: &[&str]) -> Result<bool> {
    for pattern in patterns {
        let anchored = Regex::new(&format!("^(?:{pattern})$"))?;
        if anchored.is_match(input) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Returns `true` when every value is present and not blank.
pub fn is_not_blank(values: &[Option<&str>]) -> bool {
    values
        .iter()
        .all(|value| value.is_some_and(|v| !v.trim().is_empty()))
}

/// Reads a UTF-8 string from `reader` to the end.
pub fn read_string<R: Read>(mut reader: R) -> Result<String> {
    let mut out = String::new();
    reader.read_to_string(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_numbers() {
        assert_eq!(parse_i32_or("42", 0), 42);
        assert_eq!(parse_i32_or("4x2", -1), -1);
        assert_eq!(parse_i32_or("99999999999", 7), 7);
        assert_eq!(parse_i64_or("99999999999", 7), 99_999_999_999);
        assert_eq!(parse_f64_or(" 2.5 ", 0.0), 2.5);
        assert_eq!(parse_f64_or("", 1.5), 1.5);
    }

    #[test]
    fn full_match_only() {
        assert!(matches_any("abc", &["a.c"]).unwrap());
        assert!(!matches_any("xabcx", &["a.c"]).unwrap());
        assert!(!matches_any("abc", &[]).unwrap());
        assert!(matches_any("abc", &["("]).is_err());
    }

    #[test]
    fn blank_detection() {
        assert!(is_not_blank(&[Some("a"), Some(" b ")]));
        assert!(!is_not_blank(&[Some("a"), Some("  ")]));
        assert!(!is_not_blank(&[Some("a"), None]));
        assert!(is_not_blank(&[]));
    }

    #[test]
    fn reads_to_string() {
        assert_eq!(read_string("olá".as_bytes()).unwrap(), "olá");
    }
}
