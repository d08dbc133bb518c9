//! Password strength rule.

/// Symbols accepted as the mandatory special character.
pub const SPECIAL_CHARACTERS: &str = "@#$%!";

/// Minimum password length in characters.
pub const MIN_LENGTH: usize = 8;

/// Maximum password length in characters.
pub const MAX_LENGTH: usize = 40;

/// Returns `true` for passwords of 8 to 40 characters containing at least one
/// digit, one lower-case letter, one upper-case letter and one of `@#$%!`.
///
/// Line breaks are never accepted.
///
/// ```
/// use latalisa_core::validation::password;
///
/// assert!(password::is_strong("Secr3t@pass"));
/// assert!(!password::is_strong("secret"));
/// ```
pub fn is_strong(value: &str) -> bool {
    let length = value.chars().count();
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) || value.contains(['\n', '\r']) {
        return false;
    }
    value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| SPECIAL_CHARACTERS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strong_passwords() {
        assert!(is_strong("Abcdef1!"));
        assert!(is_strong("xY9#xY9#xY9#"));
    }

    #[test]
    fn rejects_missing_classes() {
        assert!(!is_strong("abcdef1!"));
        assert!(!is_strong("ABCDEF1!"));
        assert!(!is_strong("Abcdefg!"));
        assert!(!is_strong("Abcdef12"));
        assert!(!is_strong("Abcdef1."));
    }

    #[test]
    fn enforces_length_bounds() {
        assert!(!is_strong("Ab1!"));
        assert!(is_strong(&format!("Ab1!{}", "x".repeat(36))));
        assert!(!is_strong(&format!("Ab1!{}", "x".repeat(37))));
    }
}
