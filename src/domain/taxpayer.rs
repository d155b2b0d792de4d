use std::{fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::format::{format_cnpj, format_cpf};

/// Number of digits in a CPF (individual taxpayer registry number).
pub const CPF_LEN: usize = 11;

/// Number of digits in a CNPJ (company taxpayer registry number).
pub const CNPJ_LEN: usize = 14;

/// Removes every character that is not an ASCII decimal digit.
#[must_use]
pub fn strip_non_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Returns `true` if `input` is a CPF with valid check digits.
///
/// Punctuation is ignored. Inputs with the wrong number of digits, or made of
/// a single repeated digit, are never valid.
///
/// # Examples
///
/// ```
/// use cidade::domain::taxpayer::is_valid_cpf;
///
/// assert!(is_valid_cpf("111.444.777-35"));
/// assert!(!is_valid_cpf("111.444.777-36"));
/// assert!(!is_valid_cpf("111.111.111-11"));
/// ```
#[must_use]
pub fn is_valid_cpf(input: &str) -> bool {
    check_cpf(input).is_ok()
}

/// Returns `true` if `input` is a CNPJ with valid check digits.
///
/// Punctuation is ignored. Inputs with the wrong number of digits, or made of
/// a single repeated digit, are never valid.
///
/// # Examples
///
/// ```
/// use cidade::domain::taxpayer::is_valid_cnpj;
///
/// assert!(is_valid_cnpj("46.395.000/0001-39"));
/// assert!(!is_valid_cnpj("46.395.000/0001-38"));
/// ```
#[must_use]
pub fn is_valid_cnpj(input: &str) -> bool {
    check_cnpj(input).is_ok()
}

fn to_digits(stripped: &str) -> Vec<u32> {
    stripped.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn is_repeated(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

/// Modulo-11 check digit.
///
/// Weights are applied right to left, starting at 2 and increasing by one up
/// to `max_weight`, after which they wrap back to 2.
fn check_digit(digits: &[u32], max_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .rev()
        .zip((2..=max_weight).cycle())
        .map(|(digit, weight)| digit * weight)
        .sum();

    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

fn check_cpf(input: &str) -> Result<String, CpfError> {
    let stripped = strip_non_digits(input);
    if stripped.len() != CPF_LEN {
        return Err(CpfError::Length(stripped.len()));
    }

    let digits = to_digits(&stripped);
    if is_repeated(&digits) {
        return Err(CpfError::RepeatedDigits);
    }

    // CPF weights never wrap: 10..=2 for the first digit, 11..=2 for the second.
    if check_digit(&digits[..9], 10) != digits[9] || check_digit(&digits[..10], 11) != digits[10] {
        return Err(CpfError::CheckDigit);
    }

    Ok(stripped)
}

fn check_cnpj(input: &str) -> Result<String, CnpjError> {
    let stripped = strip_non_digits(input);
    if stripped.len() != CNPJ_LEN {
        return Err(CnpjError::Length(stripped.len()));
    }

    let digits = to_digits(&stripped);
    if is_repeated(&digits) {
        return Err(CnpjError::RepeatedDigits);
    }

    if check_digit(&digits[..12], 9) != digits[12] || check_digit(&digits[..13], 9) != digits[13] {
        return Err(CnpjError::CheckDigit);
    }

    Ok(stripped)
}

/// Errors returned when constructing a [`Cpf`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CpfError {
    /// The input did not contain exactly eleven digits.
    #[error("CPF must have 11 digits, found {0}")]
    Length(usize),

    /// All digits are the same.
    #[error("CPF cannot be a single repeated digit")]
    RepeatedDigits,

    /// A check digit does not match.
    #[error("CPF check digits do not match")]
    CheckDigit,
}

/// Errors returned when constructing a [`Cnpj`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CnpjError {
    /// The input did not contain exactly fourteen digits.
    #[error("CNPJ must have 14 digits, found {0}")]
    Length(usize),

    /// All digits are the same.
    #[error("CNPJ cannot be a single repeated digit")]
    RepeatedDigits,

    /// A check digit does not match.
    #[error("CNPJ check digits do not match")]
    CheckDigit,
}

/// A validated CPF, stored as its eleven bare digits.
///
/// Displays in the `###.###.###-##` mask.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    /// Validates `input` and keeps its digits.
    ///
    /// # Errors
    ///
    /// Returns [`CpfError`] describing why the input is not a valid CPF.
    pub fn new(input: &str) -> Result<Self, CpfError> {
        check_cpf(input).map(Self)
    }

    /// The eleven digits, without punctuation.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl Deref for Cpf {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&format_cpf(&self.0))
    }
}

impl FromStr for Cpf {
    type Err = CpfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Cpf {
    type Error = CpfError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Cpf {
    type Error = CpfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.to_string()
    }
}

/// A validated CNPJ, stored as its fourteen bare digits.
///
/// Displays in the `##.###.###/####-##` mask.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cnpj(String);

impl Cnpj {
    /// Validates `input` and keeps its digits.
    ///
    /// # Errors
    ///
    /// Returns [`CnpjError`] describing why the input is not a valid CNPJ.
    pub fn new(input: &str) -> Result<Self, CnpjError> {
        check_cnpj(input).map(Self)
    }

    /// The fourteen digits, without punctuation.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl Deref for Cnpj {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&format_cnpj(&self.0))
    }
}

impl FromStr for Cnpj {
    type Err = CnpjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Cnpj {
    type Error = CnpjError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Cnpj {
    type Error = CnpjError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Cnpj> for String {
    fn from(cnpj: Cnpj) -> Self {
        cnpj.to_string()
    }
}
