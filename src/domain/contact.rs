use std::sync::LazyLock;

use regex::Regex;

use crate::domain::taxpayer::strip_non_digits;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static pattern is valid"));

/// Returns `true` if `input` holds a landline (10 digits) or mobile
/// (11 digits) number once punctuation is removed.
#[must_use]
pub fn is_valid_phone(input: &str) -> bool {
    (10..=11).contains(&strip_non_digits(input).len())
}

/// Returns `true` if `input` looks like `local@domain.tld`.
///
/// This is a shape check only; no address is ever contacted.
#[must_use]
pub fn is_valid_email(input: &str) -> bool {
    EMAIL.is_match(input)
}
