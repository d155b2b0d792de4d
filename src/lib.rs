//! Core of the Cidade Conectada citizen-services portal.
//!
//! Validation of Brazilian taxpayer ids, display formatting, Brasília time,
//! password rules and the filtered views behind the portal dashboards.

pub mod domain;
pub use domain::{
    Config,
    taxpayer::{Cnpj, Cpf, is_valid_cnpj, is_valid_cpf},
};

/// Fixture files and the workspace that holds them.
pub mod storage;
pub use storage::{Fixtures, Workspace};
