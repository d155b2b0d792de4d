//! Domain logic for the citizen-services portal.
//!
//! Everything here is pure apart from [`clock`], which reads the wall clock,
//! and [`Config`], which reads and writes its own file.

pub mod clock;
pub mod collection;
pub mod color;
/// Phone and e-mail shape checks.
pub mod contact;
pub mod filter;
pub mod format;
pub mod generate;
pub mod model;
/// Password strength rules.
pub mod password;
pub mod stats;
/// CPF and CNPJ check digits.
pub mod taxpayer;

mod config;
pub use config::Config;
