//! Dates and times in Brasília time (UTC-3).
//!
//! Brazil currently observes no daylight saving time, so Brasília time is a
//! fixed offset. Every display helper converts into that offset before
//! formatting, which keeps rendered days stable whatever the host's zone.

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone,
    Utc,
};

/// Offset of Brasília time from UTC, in seconds.
pub const BRASILIA_OFFSET_SECONDS: i32 = -3 * 60 * 60;

/// Rendered by [`display_date`] when its input cannot be parsed.
pub const INVALID_DATE: &str = "NaN/NaN/NaN";

/// Rendered by [`display_date_time`] when its input cannot be parsed.
pub const INVALID_DATE_TIME: &str = "NaN/NaN/NaN NaN:NaN";

const DATE_FORMAT: &str = "%d/%m/%Y";
const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Zone-less `T` timestamps accepted by [`parse_timestamp`], read as
/// Brasília wall-clock time.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// The fixed UTC-3 offset.
#[must_use]
pub fn brasilia() -> FixedOffset {
    FixedOffset::east_opt(BRASILIA_OFFSET_SECONDS).expect("UTC-3 is a valid offset")
}

/// The current instant, expressed in Brasília time.
#[must_use]
pub fn now_brasilia() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&brasilia())
}

/// The current instant as an RFC 3339 string with millisecond precision and
/// the `-03:00` offset, e.g. `2024-01-20T10:15:00.000-03:00`.
#[must_use]
pub fn now_iso_brasilia() -> String {
    now_brasilia().to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Errors returned by [`parse_timestamp`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseTimestampError {
    /// A bare date (no `T`, no `Z`) that is not `YYYY-MM-DD`.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    Date(String),

    /// A timestamp that is neither RFC 3339 nor a zone-less `T` timestamp.
    #[error("invalid timestamp '{0}'")]
    Timestamp(String),
}

/// Parses a timestamp string.
///
/// - A string with neither `T` nor `Z` is a bare `YYYY-MM-DD` date and is
///   taken as midnight in Brasília, never UTC or host-local midnight.
/// - Otherwise RFC 3339 is tried first; a `T` timestamp without an offset is
///   read as Brasília wall-clock time.
///
/// # Errors
///
/// Returns [`ParseTimestampError`] if the input matches none of these forms.
///
/// ```
/// use cidade::domain::clock::parse_timestamp;
///
/// let midnight = parse_timestamp("2024-01-15").unwrap();
/// assert_eq!(midnight.to_rfc3339(), "2024-01-15T00:00:00-03:00");
/// ```
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>, ParseTimestampError> {
    if !input.contains('T') && !input.contains('Z') {
        return NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .and_then(|midnight| brasilia().from_local_datetime(&midnight).single())
            .ok_or_else(|| ParseTimestampError::Date(input.to_string()));
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .and_then(|naive| brasilia().from_local_datetime(&naive).single())
        .ok_or_else(|| ParseTimestampError::Timestamp(input.to_string()))
}

/// Formats an instant as `DD/MM/YYYY` in Brasília time.
#[must_use]
pub fn format_date<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    timestamp
        .with_timezone(&brasilia())
        .format(DATE_FORMAT)
        .to_string()
}

/// Formats an instant as `DD/MM/YYYY HH:MM` in Brasília time.
#[must_use]
pub fn format_date_time<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String {
    timestamp
        .with_timezone(&brasilia())
        .format(DATE_TIME_FORMAT)
        .to_string()
}

/// Renders an optional timestamp string as `DD/MM/YYYY`.
///
/// `None` or an empty string means "now". Unparseable input renders as
/// [`INVALID_DATE`].
///
/// ```
/// use cidade::domain::clock::{display_date, INVALID_DATE};
///
/// assert_eq!(display_date(Some("2024-01-15")), "15/01/2024");
/// assert_eq!(display_date(Some("yesterday")), INVALID_DATE);
/// ```
#[must_use]
pub fn display_date(input: Option<&str>) -> String {
    resolve(input).map_or_else(|| INVALID_DATE.to_string(), |ts| format_date(&ts))
}

/// Renders an optional timestamp string as `DD/MM/YYYY HH:MM`.
///
/// `None` or an empty string means "now". Unparseable input renders as
/// [`INVALID_DATE_TIME`].
#[must_use]
pub fn display_date_time(input: Option<&str>) -> String {
    resolve(input).map_or_else(|| INVALID_DATE_TIME.to_string(), |ts| format_date_time(&ts))
}

fn resolve(input: Option<&str>) -> Option<DateTime<FixedOffset>> {
    match input {
        None | Some("") => Some(now_brasilia()),
        Some(raw) => parse_timestamp(raw)
            .inspect_err(|error| tracing::warn!(%error, "rendering unparseable timestamp"))
            .ok(),
    }
}

/// Whole years between `birth` and `today`.
///
/// The year only counts once the birthday has been reached.
#[must_use]
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years - 1
    } else {
        years
    }
}

/// Age in whole years as of today in Brasília.
#[must_use]
pub fn age(birth: NaiveDate) -> i32 {
    age_on(birth, now_brasilia().date_naive())
}

/// Number of days spanned by two instants, in either order, rounded up to a
/// whole day.
#[must_use]
pub fn days_between<A: TimeZone, B: TimeZone>(start: &DateTime<A>, end: &DateTime<B>) -> u64 {
    const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

    let elapsed = end.timestamp_millis() - start.timestamp_millis();
    elapsed.unsigned_abs().div_ceil(MILLIS_PER_DAY)
}

/// First and last day of the month containing `date`.
///
/// Returns `None` only at the very end of chrono's representable range.
#[must_use]
pub fn month_bounds(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first = date.with_day(1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}
