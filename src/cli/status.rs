use std::path::PathBuf;

use anyhow::Context;
use cidade::{
    Workspace,
    domain::{
        filter::active_city_halls,
        format::capitalize_name,
        stats::{CitizenSummary, NotificationStats, RequestStats, UserStats},
    },
};
use clap::Parser;
use serde_json::json;
use tracing::instrument;

use super::{
    OutputFormat,
    terminal::{Colorize, is_narrow, swatch},
};

#[derive(Debug, Parser, Default)]
#[command(about = "Show dashboard counters for the workspace")]
pub struct Status {
    /// Only count records of this city hall (defaults to the configured one)
    #[arg(long, value_name = "ID")]
    city_hall: Option<String>,

    /// Also show the home-screen counters of this user
    #[arg(long, value_name = "ID")]
    user: Option<String>,

    /// Output format (default: table)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::new(root)
            .load()
            .context("failed to load workspace")?;
        let fixtures = workspace.scoped(self.city_hall.as_deref());

        let requests = RequestStats::from_requests(&fixtures.requests);
        let users = UserStats::from_users(&fixtures.users);
        let notifications = NotificationStats::from_notifications(&fixtures.notifications);
        let halls = active_city_halls(&fixtures.city_halls);

        // Citizen counters are computed over every record so that a user's
        // global notifications survive the city-hall scope.
        let citizen = match self.user.as_deref() {
            Some(id) => {
                let all = workspace.fixtures();
                let user = all
                    .user(id)
                    .with_context(|| format!("no user with id '{id}'"))?;
                Some((
                    user,
                    CitizenSummary::for_user(user, &all.requests, &all.events, &all.notifications),
                ))
            }
            None => None,
        };

        if fixtures.requests.is_empty()
            && fixtures.users.is_empty()
            && fixtures.city_halls.is_empty()
        {
            println!("No records found. Set 'fixtures' in .cidade/config.toml to a fixture directory.");
            return Ok(());
        }

        match self.output {
            OutputFormat::Json => {
                let output = json!({
                    "city_halls": {
                        "total": fixtures.city_halls.len(),
                        "active": halls.len(),
                    },
                    "requests": requests,
                    "users": users,
                    "notifications": notifications,
                    "citizen": citizen.map(|(user, summary)| json!({
                        "id": user.id,
                        "summary": summary,
                    })),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!("City halls");
                println!("{}", "──────────".dim());
                for hall in &fixtures.city_halls {
                    let name = if hall.active {
                        hall.name.clone()
                    } else {
                        format!("{} {}", hall.name, "(inactive)".dim())
                    };
                    println!(
                        "{} {} {name} ({})",
                        swatch(&hall.primary_color),
                        swatch(&hall.secondary_color),
                        hall.state
                    );
                }
                println!();

                print_requests(&requests);
                println!();

                println!("Users");
                println!("{}", "─────".dim());
                println!("Total: {} ({} active)", users.total, users.active);
                for (kind, count) in &users.by_kind {
                    println!("  {kind}: {count}");
                }
                println!();

                println!(
                    "Notifications: {} sent, {} read ({:.1}%)",
                    notifications.sent, notifications.read, notifications.read_rate
                );

                if let Some((user, summary)) = citizen {
                    println!();
                    println!("{}", capitalize_name(&user.name));
                    println!("{}", "─".repeat(user.name.chars().count()).dim());
                    println!("Open requests: {}", summary.open_requests);
                    println!("Events: {}", summary.events);
                    println!("Unread notifications: {}", summary.unread_notifications);
                }
            }
        }

        Ok(())
    }
}

fn print_requests(stats: &RequestStats) {
    println!("Requests");
    println!("{}", "────────".dim());

    let rows = [
        ("pendente", stats.pending.to_string().warning()),
        ("andamento", stats.in_progress.to_string()),
        ("concluida", stats.completed.to_string().success()),
        ("cancelada", stats.cancelled.to_string().dim()),
    ];

    if is_narrow() {
        for (status, count) in rows {
            println!("{status}: {count}");
        }
        println!("Total: {}", stats.total);
    } else {
        println!("{:<10} Count", "Status");
        for (status, count) in rows {
            println!("{status:<10} {count}");
        }
        println!("{:<10} {}", "Total", stats.total);
    }

    match stats.average_resolution_days {
        Some(days) => println!("Average resolution: {days:.1} days"),
        None => println!("{}", "Average resolution: –".dim()),
    }
}
