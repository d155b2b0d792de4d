use anyhow::Context;
use cidade::domain::{clock, format};
use clap::{Parser, ValueEnum};
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Print a value in its display mask")]
pub struct Format {
    /// Which mask to apply
    #[arg(value_enum)]
    kind: FormatKind,

    /// The value to format. Dates default to now.
    value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatKind {
    Cpf,
    Cnpj,
    Phone,
    Currency,
    Date,
    Datetime,
    Name,
    Slug,
}

impl Format {
    #[instrument(level = "debug", skip(self), fields(kind = ?self.kind))]
    pub fn run(self) -> anyhow::Result<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    fn render(&self) -> anyhow::Result<String> {
        let value = self.value.as_deref();
        let required = || value.with_context(|| format!("{:?} needs a value", self.kind));

        Ok(match self.kind {
            FormatKind::Cpf => format::format_cpf(required()?),
            FormatKind::Cnpj => format::format_cnpj(required()?),
            FormatKind::Phone => format::format_phone(required()?),
            FormatKind::Currency => {
                let raw = required()?;
                let amount: f64 = raw
                    .replace(',', ".")
                    .parse()
                    .with_context(|| format!("'{raw}' is not an amount"))?;
                format::format_currency(amount)
            }
            FormatKind::Date => clock::display_date(value),
            FormatKind::Datetime => clock::display_date_time(value),
            FormatKind::Name => format::capitalize_name(required()?),
            FormatKind::Slug => format::slugify(required()?),
        })
    }
}
