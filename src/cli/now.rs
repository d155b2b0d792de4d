use cidade::domain::clock;
use clap::Parser;
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Print the current Brasília date and time")]
pub struct Now {
    /// Print an RFC 3339 timestamp instead of DD/MM/YYYY HH:MM
    #[arg(long)]
    iso: bool,
}

impl Now {
    #[instrument(level = "debug")]
    pub fn run(self) {
        if self.iso {
            println!("{}", clock::now_iso_brasilia());
        } else {
            println!("{}", clock::display_date_time(None));
        }
    }
}
