use std::process;

use cidade::domain::{
    contact::{is_valid_email, is_valid_phone},
    password,
    taxpayer::{Cnpj, Cpf},
};
use clap::{Parser, ValueEnum};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Validate a CPF, CNPJ, phone, e-mail or password")]
pub struct Check {
    /// What kind of value to check
    #[arg(value_enum)]
    kind: CheckKind,

    /// The value to check
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CheckKind {
    Cpf,
    Cnpj,
    Phone,
    Email,
    Password,
}

impl Check {
    #[instrument(level = "debug", skip(self), fields(kind = ?self.kind))]
    pub fn run(self) -> anyhow::Result<()> {
        let problems = self.problems();

        if problems.is_empty() {
            println!("{} valid", "✔".success());
            return Ok(());
        }

        println!("{} invalid", "✘".failure());
        for problem in &problems {
            println!("  - {}", problem.warning());
        }
        process::exit(1);
    }

    fn problems(&self) -> Vec<String> {
        let value = self.value.as_str();
        match self.kind {
            CheckKind::Cpf => Cpf::new(value).err().map(|e| e.to_string()).into_iter().collect(),
            CheckKind::Cnpj => Cnpj::new(value).err().map(|e| e.to_string()).into_iter().collect(),
            CheckKind::Phone => (!is_valid_phone(value))
                .then(|| "phone must have 10 (landline) or 11 (mobile) digits".to_string())
                .into_iter()
                .collect(),
            CheckKind::Email => (!is_valid_email(value))
                .then(|| "e-mail must look like name@domain.tld".to_string())
                .into_iter()
                .collect(),
            CheckKind::Password => password::evaluate(value)
                .violations
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn check(kind: CheckKind, value: &str) -> Vec<String> {
        Check {
            kind,
            value: value.to_string(),
        }
        .problems()
    }

    #[test_case(CheckKind::Cpf, "111.444.777-35")]
    #[test_case(CheckKind::Cnpj, "11.222.333/0001-81")]
    #[test_case(CheckKind::Phone, "(11) 3113-9000")]
    #[test_case(CheckKind::Email, "contato@rio.rj.gov.br")]
    #[test_case(CheckKind::Password, "Prefeitura#2024")]
    fn accepts(kind: CheckKind, value: &str) {
        assert!(check(kind, value).is_empty());
    }

    #[test]
    fn cpf_problem_names_the_reason() {
        assert_eq!(
            check(CheckKind::Cpf, "123.456"),
            ["CPF must have 11 digits, found 6"]
        );
    }

    #[test]
    fn password_lists_every_violation() {
        assert_eq!(check(CheckKind::Password, "abc").len(), 4);
    }
}
