use std::path::PathBuf;

use anyhow::Context;
use cidade::{Config, Workspace, domain::stats::ReportFormat};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// City hall the workspace is scoped to
    #[arg(long, value_name = "ID")]
    city_hall: Option<String>,

    /// Fixture directory, relative to the workspace root
    #[arg(long, value_name = "DIR")]
    fixtures: Option<PathBuf>,

    /// Default reporting window in days
    #[arg(long, value_name = "DAYS")]
    period: Option<u32>,

    /// Default export format: pdf, excel or csv
    #[arg(long)]
    format: Option<ReportFormat>,
}

impl Init {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::new(root);
        let config = self.config();

        let path = workspace
            .init(&config)
            .context("failed to initialise workspace")?;

        println!("Initialised portal workspace in {}", workspace.root().display());
        println!("  Created: {}", path.display());

        let fixtures = config.fixtures_dir(workspace.root());
        if !fixtures.is_dir() {
            println!(
                "{}",
                format!("  Fixture directory {} does not exist yet", fixtures.display()).warning()
            );
        }

        println!();
        println!("Next steps:");
        println!("  cidade status");
        println!("  cidade list requests --status pendente");

        Ok(())
    }

    fn config(&self) -> Config {
        let mut config = Config::default();
        config.city_hall.clone_from(&self.city_hall);
        if let Some(fixtures) = &self.fixtures {
            config.set_fixtures(fixtures);
        }
        if let Some(period) = self.period {
            config.report_period_days = period;
        }
        if let Some(format) = self.format {
            config.report_format = format;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;

    use super::*;

    #[test]
    fn arguments_become_config_values() {
        let init = Init::try_parse_from([
            "init",
            "--city-hall",
            "2",
            "--fixtures",
            "data",
            "--period",
            "7",
            "--format",
            "csv",
        ])
        .unwrap();

        let config = init.config();
        assert_eq!(config.city_hall.as_deref(), Some("2"));
        assert_eq!(config.fixtures(), Path::new("data"));
        assert_eq!(config.report_period_days, 7);
        assert_eq!(config.report_format, ReportFormat::Csv);
    }

    #[test]
    fn no_arguments_is_the_default_config() {
        let init = Init::try_parse_from(["init"]).unwrap();
        assert_eq!(init.config(), Config::default());
    }

    #[test]
    fn second_init_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path().to_path_buf();

        Init::try_parse_from(["init"]).unwrap().run(root.clone()).unwrap();
        assert!(Init::try_parse_from(["init"]).unwrap().run(root).is_err());
    }
}
