use std::{fmt, path::PathBuf, str::FromStr};

use anyhow::Context;
use cidade::{
    Workspace,
    domain::{
        clock::{display_date, display_date_time, parse_timestamp},
        collection::{SortDirection, group_by, sort_by},
        filter::{CityHallQuery, NotificationQuery, RequestQuery, Search, Selection, UserQuery},
        format::{format_cnpj, format_phone},
        model::{CityHall, Notification, RequestStatus, ServiceRequest, User, UserKind},
        taxpayer::is_valid_cnpj,
    },
};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::instrument;

use super::{
    OutputFormat,
    terminal::{Colorize, print_table},
};

/// Command arguments for `cidade list`.
#[derive(Debug, Parser)]
#[command(about = "List users, requests, city halls or notifications")]
pub struct List {
    /// Which records to list
    #[arg(value_enum)]
    entity: Entity,

    /// Case-insensitive match on names; CPF and phone match as typed
    #[arg(long)]
    search: Option<String>,

    /// Request status (pendente, andamento, concluida, cancelada or todos)
    #[arg(long)]
    status: Option<Selection<RequestStatus>>,

    /// User access level, or request category
    #[arg(long)]
    kind: Option<String>,

    /// City-hall state code (UF)
    #[arg(long)]
    state: Option<String>,

    /// Only records of this city hall (defaults to the configured one)
    #[arg(long, value_name = "ID")]
    city_hall: Option<String>,

    /// Only notifications addressed to this user
    #[arg(long, value_name = "ID")]
    user: Option<String>,

    /// Only active city halls, or unread notifications
    #[arg(long)]
    active: bool,

    /// Sort field
    #[arg(long, value_enum)]
    sort: Option<SortField>,

    /// Sort in descending order
    #[arg(long)]
    desc: bool,

    /// Print requests in one section per status
    #[arg(long)]
    group_by_status: bool,

    /// Output format (default: table)
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

/// Listable record types.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Entity {
    Users,
    Requests,
    CityHalls,
    Notifications,
}

/// Sortable fields. Not every field applies to every record type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum SortField {
    Name,
    Date,
    Priority,
    Status,
    Kind,
    State,
    Protocol,
}

impl List {
    #[instrument(level = "debug", skip_all, fields(entity = ?self.entity))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let workspace = Workspace::new(root)
            .load()
            .context("failed to load workspace")?;
        let fixtures = workspace.scoped(self.city_hall.as_deref());

        match self.entity {
            Entity::Users => self.list_users(&fixtures.users),
            Entity::Requests => self.list_requests(&fixtures.requests),
            Entity::CityHalls => self.list_city_halls(&fixtures.city_halls),
            Entity::Notifications => self.list_notifications(&fixtures.notifications),
        }
    }

    fn search(&self) -> Search {
        self.search.as_deref().map(Search::new).unwrap_or_default()
    }

    const fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    fn list_users(&self, users: &[User]) -> anyhow::Result<()> {
        let query = UserQuery {
            search: self.search(),
            kind: selection::<UserKind>(self.kind.as_deref())?,
            city_hall: self.city_hall.clone(),
        };
        let matched = query.apply(users);

        let rows = match self.sort {
            None => matched,
            Some(SortField::Name) => sorted(matched, |u| u.name.to_lowercase(), self.direction()),
            Some(SortField::Date) => {
                sorted(matched, |u| parse_timestamp(&u.created).ok(), self.direction())
            }
            Some(SortField::Kind) => sorted(matched, |u| u.kind, self.direction()),
            Some(field) => anyhow::bail!("users cannot be sorted by {field}"),
        };

        render(&rows, self.output, &["ID", "Name", "CPF", "Phone", "Kind", "Created"], |u| {
            vec![
                u.id.clone(),
                u.name.clone(),
                u.cpf.clone(),
                format_phone(&u.phone),
                u.kind.to_string(),
                display_date(Some(&u.created)),
            ]
        })
    }

    fn list_requests(&self, requests: &[ServiceRequest]) -> anyhow::Result<()> {
        let query = RequestQuery {
            search: self.search(),
            status: self.status.clone().unwrap_or_default(),
            kind: selection(self.kind.as_deref())?,
            city_hall: self.city_hall.clone(),
        };
        let matched = query.apply(requests);

        let rows = match self.sort {
            None => matched,
            Some(SortField::Date) => {
                sorted(matched, |r| parse_timestamp(&r.date).ok(), self.direction())
            }
            Some(SortField::Priority) => sorted(matched, |r| r.priority, self.direction()),
            Some(SortField::Status) => sorted(matched, |r| r.status, self.direction()),
            Some(SortField::Kind) => sorted(matched, |r| r.kind.to_lowercase(), self.direction()),
            Some(SortField::Protocol) => sorted(matched, |r| r.protocol.clone(), self.direction()),
            Some(field) => anyhow::bail!("requests cannot be sorted by {field}"),
        };

        let headers = ["Protocol", "Category", "Status", "Priority", "Filed", "Location"];
        let columns = |r: &ServiceRequest| {
            vec![
                r.protocol.clone(),
                r.kind.clone(),
                r.status.to_string(),
                r.priority.to_string(),
                display_date_time(Some(&r.date)),
                r.location.clone(),
            ]
        };

        if self.group_by_status && self.output == OutputFormat::Table {
            for (status, group) in group_by(&rows, |r| r.status) {
                println!("{} ({})", status.warning(), group.len());
                let group: Vec<&ServiceRequest> = group.into_iter().copied().collect();
                render(&group, self.output, &headers, columns)?;
                println!();
            }
            return Ok(());
        }

        if self.group_by_status {
            let groups = group_by(&rows, |r| r.status);
            serde_json::to_writer_pretty(std::io::stdout(), &groups)
                .context("failed to render json output")?;
            println!();
            return Ok(());
        }

        render(&rows, self.output, &headers, columns)
    }

    fn list_city_halls(&self, halls: &[CityHall]) -> anyhow::Result<()> {
        let query = CityHallQuery {
            search: self.search(),
            state: selection(self.state.as_deref())?,
            active_only: self.active,
        };
        let matched = query.apply(halls);

        let rows = match self.sort {
            None => matched,
            Some(SortField::Name) => sorted(matched, |h| h.name.to_lowercase(), self.direction()),
            Some(SortField::State) => sorted(matched, |h| h.state.clone(), self.direction()),
            Some(SortField::Date) => {
                sorted(matched, |h| parse_timestamp(&h.created).ok(), self.direction())
            }
            Some(field) => anyhow::bail!("city halls cannot be sorted by {field}"),
        };

        render(&rows, self.output, &["ID", "Name", "UF", "CNPJ", "Active", "Modules"], |h| {
            let cnpj = format_cnpj(&h.cnpj);
            vec![
                h.id.clone(),
                h.name.clone(),
                h.state.clone(),
                if is_valid_cnpj(&h.cnpj) {
                    cnpj
                } else {
                    format!("{cnpj} (invalid)")
                },
                yes_no(h.active),
                h.settings.active_modules.len().to_string(),
            ]
        })
    }

    fn list_notifications(&self, notifications: &[Notification]) -> anyhow::Result<()> {
        let query = NotificationQuery {
            user: self.user.clone(),
            city_hall: self.city_hall.clone(),
            exclude_global: false,
            unread_only: self.active,
        };
        let matched = query.apply(notifications);

        let rows = match self.sort {
            None => matched,
            Some(SortField::Date) => {
                sorted(matched, |n| parse_timestamp(&n.date).ok(), self.direction())
            }
            Some(SortField::Priority) => sorted(matched, |n| n.priority, self.direction()),
            Some(SortField::Kind) => sorted(matched, |n| n.kind, self.direction()),
            Some(field) => anyhow::bail!("notifications cannot be sorted by {field}"),
        };

        render(&rows, self.output, &["ID", "Title", "Kind", "Priority", "Date", "Read"], |n| {
            vec![
                n.id.clone(),
                n.title.clone(),
                n.kind.to_string(),
                n.priority.to_string(),
                display_date(Some(&n.date)),
                yes_no(n.read),
            ]
        })
    }
}

fn selection<T: FromStr>(value: Option<&str>) -> Result<Selection<T>, T::Err> {
    value.map_or(Ok(Selection::All), str::parse)
}

fn sorted<'a, T, K, F>(rows: Vec<&'a T>, key: F, direction: SortDirection) -> Vec<&'a T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    sort_by(&rows, |row| key(*row), direction)
        .into_iter()
        .copied()
        .collect()
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn render<T, F>(rows: &[&T], output: OutputFormat, headers: &[&str], columns: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: Fn(&T) -> Vec<String>,
{
    match output {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), rows)
                .context("failed to render json output")?;
            println!();
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", "No matching records.".dim());
                return Ok(());
            }
            let data: Vec<Vec<String>> = rows.iter().map(|row| columns(*row)).collect();
            print_table(headers, &data);
        }
    }
    Ok(())
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Date => "date",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Kind => "kind",
            Self::State => "state",
            Self::Protocol => "protocol",
        })
    }
}
