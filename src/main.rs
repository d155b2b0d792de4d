//! Command-line tools for the Cidade Conectada portal core.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
