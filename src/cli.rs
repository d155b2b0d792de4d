use std::path::PathBuf;

mod check;
mod format;
mod init;
mod list;
mod now;
mod report;
mod status;
mod terminal;

use check::Check;
use clap::ArgAction;
use format::Format;
use init::Init;
use list::List;
use now::Now;
use report::Report;
use status::Status;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the portal workspace
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show dashboard counters (default)
    Status(Status),

    /// Validate a CPF, CNPJ, phone, e-mail or password
    ///
    /// Exits with status 1 when the value is invalid.
    Check(Check),

    /// Print a value in its display mask
    Format(Format),

    /// Print the current Brasília date and time
    Now(Now),

    /// List users, requests, city halls or notifications
    List(List),

    /// Print the payload of an administrator's report export
    Report(Report),

    /// Write a default configuration file
    Init(Init),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Check(command) => command.run()?,
            Self::Format(command) => command.run()?,
            Self::Now(command) => command.run(),
            Self::List(command) => command.run(root)?,
            Self::Report(command) => command.run(root)?,
            Self::Init(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// Output format shared by the listing commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}
