use std::path::PathBuf;

use anyhow::Context;
use cidade::{
    Config, Fixtures, Workspace,
    domain::{
        filter::{RequestQuery, Selection},
        model::RequestStatus,
        stats::{self, ReportFormat},
    },
};
use clap::Parser;
use tracing::instrument;

/// Command arguments for `cidade report`.
#[derive(Debug, Parser)]
#[command(about = "Print the payload of an administrator's report export")]
pub struct Report {
    /// Reporting window in days (defaults to the configured window)
    #[arg(long, value_name = "DAYS")]
    period: Option<u32>,

    /// Export format: pdf, excel or csv (defaults to the configured format)
    #[arg(long)]
    format: Option<ReportFormat>,

    /// Only count records of this city hall (defaults to the configured one)
    #[arg(long, value_name = "ID")]
    city_hall: Option<String>,

    /// Only count requests with this status
    #[arg(long)]
    status: Option<Selection<RequestStatus>>,
}

impl Report {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::new(root)
            .load()
            .context("failed to load workspace")?;
        let fixtures = workspace.scoped(self.city_hall.as_deref());

        let report = self.build(workspace.config(), &fixtures);
        tracing::info!(
            requests = report.requests,
            users = report.users,
            "Generated {} report",
            report.format
        );

        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

    fn build(&self, config: &Config, fixtures: &Fixtures) -> stats::Report {
        let query = RequestQuery {
            status: self.status.clone().unwrap_or_default(),
            ..RequestQuery::default()
        };

        stats::Report::new(
            self.period.unwrap_or(config.report_period_days),
            self.format.unwrap_or(config.report_format),
            query.apply(&fixtures.requests).len(),
            fixtures.users.len(),
        )
    }
}
