use std::fmt;

use serde::Serialize;

/// Minimum number of characters a password must have.
pub const MIN_LENGTH: usize = 8;

/// Characters that satisfy the special-character rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// A password rule that was not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// Fewer than [`MIN_LENGTH`] characters.
    TooShort,
    /// No ASCII uppercase letter.
    MissingUppercase,
    /// No ASCII lowercase letter.
    MissingLowercase,
    /// No ASCII digit.
    MissingDigit,
    /// None of [`SPECIAL_CHARACTERS`].
    MissingSpecial,
}

impl Violation {
    /// The message shown to the person choosing the password.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::TooShort => "A senha deve ter pelo menos 8 caracteres",
            Self::MissingUppercase => "A senha deve conter pelo menos uma letra maiúscula",
            Self::MissingLowercase => "A senha deve conter pelo menos uma letra minúscula",
            Self::MissingDigit => "A senha deve conter pelo menos um número",
            Self::MissingSpecial => "A senha deve conter pelo menos um caractere especial",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordReport {
    /// `true` when no rule was violated.
    pub valid: bool,
    /// Every violated rule, in evaluation order.
    pub violations: Vec<Violation>,
}

/// Checks a password against every rule.
///
/// All rules are evaluated even after one fails, always in the same order:
/// length, uppercase, lowercase, digit, special character.
///
/// Length is counted in UTF-16 code units, so a character outside the basic
/// multilingual plane (most emoji) counts twice.
///
/// ```
/// use cidade::domain::password::{evaluate, Violation};
///
/// let report = evaluate("abc");
/// assert!(!report.valid);
/// assert_eq!(report.violations.len(), 4);
/// assert_eq!(report.violations[0], Violation::TooShort);
///
/// assert!(evaluate("Abcdef1!").valid);
/// ```
#[must_use]
pub fn evaluate(password: &str) -> PasswordReport {
    let rules: [(Violation, bool); 5] = [
        (Violation::TooShort, password.encode_utf16().count() >= MIN_LENGTH),
        (
            Violation::MissingUppercase,
            password.chars().any(|c| c.is_ascii_uppercase()),
        ),
        (
            Violation::MissingLowercase,
            password.chars().any(|c| c.is_ascii_lowercase()),
        ),
        (
            Violation::MissingDigit,
            password.chars().any(|c| c.is_ascii_digit()),
        ),
        (
            Violation::MissingSpecial,
            password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        ),
    ];

    let violations: Vec<Violation> = rules
        .into_iter()
        .filter_map(|(violation, passed)| (!passed).then_some(violation))
        .collect();

    PasswordReport {
        valid: violations.is_empty(),
        violations,
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn short_lowercase_password_collects_four_violations() {
        let report = evaluate("abc");
        assert!(!report.valid);
        assert_eq!(
            report.violations,
            vec![
                Violation::TooShort,
                Violation::MissingUppercase,
                Violation::MissingDigit,
                Violation::MissingSpecial,
            ]
        );
    }

    #[test]
    fn strong_password_is_valid() {
        let report = evaluate("Abcdef1!");
        assert!(report.valid);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn empty_password_violates_everything() {
        let report = evaluate("");
        assert_eq!(report.violations.len(), 5);
    }

    #[test_case("ABCDEFG1!", Violation::MissingLowercase; "no lowercase")]
    #[test_case("abcdefg1!", Violation::MissingUppercase; "no uppercase")]
    #[test_case("Abcdefgh!", Violation::MissingDigit; "no digit")]
    #[test_case("Abcdefgh1", Violation::MissingSpecial; "no special")]
    #[test_case("Abc1!", Violation::TooShort; "too short")]
    fn single_violation(password: &str, expected: Violation) {
        assert_eq!(evaluate(password).violations, vec![expected]);
    }

    #[test]
    fn only_listed_specials_count() {
        assert_eq!(
            evaluate("Abcdefg1-").violations,
            vec![Violation::MissingSpecial]
        );
        for special in SPECIAL_CHARACTERS.chars() {
            let password = format!("Abcdefg1{special}");
            assert!(evaluate(&password).valid, "{password}");
        }
    }

    #[test]
    fn length_counts_utf16_units() {
        // Six characters, two of them outside the basic multilingual plane.
        assert!(evaluate("Ab1!😀😀").valid);
        assert_eq!(evaluate("Ab1!😀").violations, vec![Violation::TooShort]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // Seven characters, more than eight bytes.
        assert_eq!(evaluate("Ação1!é").violations, vec![Violation::TooShort]);
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            Violation::TooShort.to_string(),
            "A senha deve ter pelo menos 8 caracteres"
        );
    }
}
