//! Dashboard roll-ups and the administrator's export payload.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::{
    clock::{self, parse_timestamp},
    collection::count_by,
    filter::NotificationQuery,
    model::{Event, Notification, RequestStatus, ServiceRequest, User},
};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Request counts per lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RequestStats {
    /// Every request.
    pub total: usize,
    /// Awaiting triage.
    pub pending: usize,
    /// Being worked on.
    pub in_progress: usize,
    /// Resolved.
    pub completed: usize,
    /// Withdrawn or rejected.
    pub cancelled: usize,
    /// Mean days from filing to the last update, over completed requests
    /// whose timestamps parse. `None` when there are none.
    pub average_resolution_days: Option<f64>,
}

impl RequestStats {
    /// Tallies `requests`.
    pub fn from_requests<'a>(requests: impl IntoIterator<Item = &'a ServiceRequest>) -> Self {
        let mut stats = Self::default();
        let mut resolution_days = Vec::new();

        for request in requests {
            stats.total += 1;
            match request.status {
                RequestStatus::Pending => stats.pending += 1,
                RequestStatus::InProgress => stats.in_progress += 1,
                RequestStatus::Completed => {
                    stats.completed += 1;
                    if let Some(days) = resolution_time(request) {
                        resolution_days.push(days);
                    }
                }
                RequestStatus::Cancelled => stats.cancelled += 1,
            }
        }

        if !resolution_days.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let mean = resolution_days.iter().sum::<f64>() / resolution_days.len() as f64;
            stats.average_resolution_days = Some(mean);
        }
        stats
    }

    /// Requests not yet completed.
    #[must_use]
    pub const fn open(&self) -> usize {
        self.total - self.completed
    }
}

fn resolution_time(request: &ServiceRequest) -> Option<f64> {
    let filed = parse_timestamp(&request.date).ok()?;
    let closed = parse_timestamp(request.updated.as_deref()?).ok()?;
    #[allow(clippy::cast_precision_loss)]
    let seconds = (closed - filed).num_seconds() as f64;
    Some(seconds / SECONDS_PER_DAY)
}

/// Account counts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UserStats {
    /// Every account.
    pub total: usize,
    /// Enabled accounts.
    pub active: usize,
    /// Accounts per access level label.
    pub by_kind: BTreeMap<String, usize>,
}

impl UserStats {
    /// Tallies `users`.
    #[must_use]
    pub fn from_users(users: &[User]) -> Self {
        Self {
            total: users.len(),
            active: users.iter().filter(|u| u.active).count(),
            by_kind: count_by(users, |u| u.kind),
        }
    }
}

/// Delivery figures for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NotificationStats {
    /// Notifications sent.
    pub sent: usize,
    /// Notifications read.
    pub read: usize,
    /// Share of sent notifications that were read, as a percentage.
    pub read_rate: f64,
}

impl NotificationStats {
    /// Tallies `notifications`.
    pub fn from_notifications<'a>(
        notifications: impl IntoIterator<Item = &'a Notification>,
    ) -> Self {
        let (sent, read) = notifications
            .into_iter()
            .fold((0, 0), |(sent, read), n| (sent + 1, read + usize::from(n.read)));

        #[allow(clippy::cast_precision_loss)]
        let read_rate = if sent == 0 {
            0.0
        } else {
            read as f64 * 100.0 / sent as f64
        };

        Self {
            sent,
            read,
            read_rate,
        }
    }
}

/// The three counters on a citizen's home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CitizenSummary {
    /// The citizen's requests not yet completed.
    pub open_requests: usize,
    /// Listed events in the citizen's city hall.
    pub events: usize,
    /// Notifications addressed to the citizen that are still unread.
    pub unread_notifications: usize,
}

impl CitizenSummary {
    /// Builds the summary for `user`.
    ///
    /// A user without a city hall sees every listed event and only
    /// platform-wide notifications.
    #[must_use]
    pub fn for_user(
        user: &User,
        requests: &[ServiceRequest],
        events: &[Event],
        notifications: &[Notification],
    ) -> Self {
        let hall = user.city_hall_id.as_deref();

        let open_requests = requests
            .iter()
            .filter(|r| r.user_id == user.id && r.status.is_open())
            .count();

        let events = events
            .iter()
            .filter(|e| e.active && hall.is_none_or(|id| e.city_hall_id == id))
            .count();

        let query = NotificationQuery {
            user: Some(user.id.clone()),
            city_hall: user.city_hall_id.clone(),
            exclude_global: false,
            unread_only: true,
        };
        let unread_notifications = notifications
            .iter()
            .filter(|n| query.matches(n) && (hall.is_some() || n.city_hall_id.is_none()))
            .count();

        Self {
            open_requests,
            events,
            unread_notifications,
        }
    }
}

/// File format of an exported report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Printable document.
    #[default]
    Pdf,
    /// Spreadsheet.
    Excel,
    /// Comma-separated values.
    Csv,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "excel" => Ok(Self::Excel),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown report format: {other}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pdf => "pdf",
            Self::Excel => "excel",
            Self::Csv => "csv",
        })
    }
}

/// What an administrator's export contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Reporting window in days.
    pub period_days: u32,
    /// Export format.
    pub format: ReportFormat,
    /// Requests included.
    pub requests: usize,
    /// Users included.
    pub users: usize,
    /// Generation time, `DD/MM/YYYY HH:MM` in Brasília.
    pub generated_at: String,
}

impl Report {
    /// A report generated now.
    #[must_use]
    pub fn new(period_days: u32, format: ReportFormat, requests: usize, users: usize) -> Self {
        Self::generated_at(clock::now_brasilia(), period_days, format, requests, users)
    }

    /// A report stamped with `instant`.
    #[must_use]
    pub fn generated_at(
        instant: DateTime<FixedOffset>,
        period_days: u32,
        format: ReportFormat,
        requests: usize,
        users: usize,
    ) -> Self {
        Self {
            period_days,
            format,
            requests,
            users,
            generated_at: clock::format_date_time(&instant),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{clock::brasilia, model::samples};

    #[test]
    fn request_stats_over_samples() {
        let stats = RequestStats::from_requests(&samples::requests());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.in_progress, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.cancelled, 0);
        assert_eq!(stats.open(), 3);

        // Filed 10/01 08:15, closed 12/01 17:45.
        let days = stats.average_resolution_days.unwrap();
        assert!((days - 2.395_833).abs() < 1e-5, "{days}");
    }

    #[test]
    fn request_stats_of_nothing() {
        let stats = RequestStats::from_requests(&[]);
        assert_eq!(stats, RequestStats::default());
        assert_eq!(stats.average_resolution_days, None);
    }

    #[test]
    fn user_stats_by_kind() {
        let stats = UserStats::from_users(&samples::users());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.active, 5);
        assert_eq!(stats.by_kind["cidadao"], 2);
        assert_eq!(stats.by_kind["super_admin"], 1);
    }

    #[test]
    fn notification_read_rate() {
        let stats = NotificationStats::from_notifications(&samples::notifications());
        assert_eq!(stats.sent, 5);
        assert_eq!(stats.read, 1);
        assert!((stats.read_rate - 20.0).abs() < f64::EPSILON);

        let empty = NotificationStats::from_notifications(&[]);
        assert_eq!(empty.sent, 0);
        assert!(empty.read_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn citizen_summary() {
        let users = samples::users();
        let summary = CitizenSummary::for_user(
            &users[0],
            &samples::requests(),
            &samples::events(),
            &samples::notifications(),
        );
        assert_eq!(
            summary,
            CitizenSummary {
                open_requests: 2,
                events: 3,
                unread_notifications: 3,
            }
        );
    }

    #[test]
    fn platform_admin_sees_only_global_notifications() {
        let users = samples::users();
        let summary = CitizenSummary::for_user(
            &users[4],
            &samples::requests(),
            &samples::events(),
            &samples::notifications(),
        );
        assert_eq!(summary.open_requests, 0);
        assert_eq!(summary.events, 4);
        assert_eq!(summary.unread_notifications, 0);
    }

    #[test]
    fn report_payload() {
        let instant = brasilia()
            .with_ymd_and_hms(2024, 1, 20, 9, 5, 0)
            .single()
            .unwrap();
        let report = Report::generated_at(instant, 30, ReportFormat::Csv, 4, 5);
        assert_eq!(report.generated_at, "20/01/2024 09:05");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["format"], "csv");
        assert_eq!(json["period_days"], 30);
    }

    #[test]
    fn report_format_parses() {
        assert_eq!("EXCEL".parse::<ReportFormat>(), Ok(ReportFormat::Excel));
        assert!("docx".parse::<ReportFormat>().is_err());
    }
}
