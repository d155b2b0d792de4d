//! Identifier and code generators.
//!
//! Randomness comes from version 4 UUIDs, which are drawn from the operating
//! system's secure random source.

use chrono::Datelike;
use uuid::Uuid;

use crate::domain::clock::now_brasilia;

/// Default protocol prefix for service requests.
pub const REQUEST_PREFIX: &str = "SOL";

/// Alphabet for temporary passwords, without look-alike glyphs
/// (`I`, `O`, `l`, `o`, `0`, `1`).
const PASSWORD_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnpqrstuvwxyz23456789";

const PASSWORD_LEN: usize = 8;

/// UUID byte positions holding the version and variant bits.
const UUID_FIXED_BYTES: [usize; 2] = [6, 8];

/// Bytes at or above this value are discarded so every alphabet symbol is
/// equally likely.
const UNBIASED_BYTE_LIMIT: usize = 256 - 256 % PASSWORD_ALPHABET.len();

/// A protocol number of the form `PREFIX-YYYY-NNNNNN`, where the year is the
/// current year in Brasília and the suffix is the last six digits of the
/// current epoch milliseconds.
#[must_use]
pub fn protocol(prefix: &str) -> String {
    let now = now_brasilia();
    let suffix = now.timestamp_millis().rem_euclid(1_000_000);
    format!("{prefix}-{}-{suffix:06}", now.year())
}

/// The protocol assigned to the next request when `existing` requests are
/// already registered: `SOL-YYYY-NNN`, counting from one.
///
/// ```
/// use cidade::domain::generate::next_sequential_protocol;
///
/// assert_eq!(next_sequential_protocol(4, 2024), "SOL-2024-005");
/// ```
#[must_use]
pub fn next_sequential_protocol(existing: usize, year: i32) -> String {
    format!("{REQUEST_PREFIX}-{year}-{:03}", existing + 1)
}

/// A six-digit password recovery code.
#[must_use]
pub fn recovery_code() -> String {
    let value = Uuid::new_v4().as_u128() % 1_000_000;
    format!("{value:06}")
}

/// An eight-character temporary password drawn uniformly from an
/// unambiguous alphabet.
#[must_use]
pub fn temporary_password() -> String {
    let mut password = String::with_capacity(PASSWORD_LEN);
    while password.len() < PASSWORD_LEN {
        let uuid = Uuid::new_v4();
        let symbols = uuid
            .as_bytes()
            .iter()
            .enumerate()
            .filter(|(index, _)| !UUID_FIXED_BYTES.contains(index))
            .map(|(_, byte)| usize::from(*byte))
            .filter(|byte| *byte < UNBIASED_BYTE_LIMIT)
            .map(|byte| char::from(PASSWORD_ALPHABET[byte % PASSWORD_ALPHABET.len()]));

        for symbol in symbols.take(PASSWORD_LEN - password.len()) {
            password.push(symbol);
        }
    }
    password
}

/// A fresh random record id.
#[must_use]
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}
