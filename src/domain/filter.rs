//! Dashboard queries over record snapshots.
//!
//! Every query borrows the records it is given and returns the matching
//! subset in its original order. Predicates within a query are combined with
//! logical AND; a default query matches everything.

use std::{convert::Infallible, fmt, str::FromStr};

use crate::domain::model::{CityHall, Notification, RequestStatus, ServiceRequest, User, UserKind};

/// Either every value, or exactly one.
///
/// Parses `todos` or `all` (in any case) as [`Selection::All`]; anything else
/// is parsed as a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<T> {
    /// No restriction.
    #[default]
    All,
    /// Only this value.
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    /// Returns `true` if `value` is selected.
    #[must_use]
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == value,
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("todos") || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("todos"),
            Self::Only(value) => value.fmt(f),
        }
    }
}

/// A free-text search term.
///
/// Names match case-insensitively; identifier fields such as CPF and phone
/// match as typed, so `123.456` finds `123.456.789-01` but `123456` does not.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Search {
    raw: String,
    folded: String,
}

impl Search {
    /// Creates a search for `term`, taken as typed. Whitespace is part of
    /// the term, so `"santos "` does not match a name ending in `Santos`.
    #[must_use]
    pub fn new(term: &str) -> Self {
        let raw = term.to_string();
        let folded = raw.to_lowercase();
        Self { raw, folded }
    }

    /// `true` when there is nothing to search for.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    fn in_text(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.folded)
    }

    fn in_identifier(&self, identifier: &str) -> bool {
        identifier.contains(&self.raw)
    }
}

impl FromStr for Search {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Filters for the user table.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Matches name, CPF or phone.
    pub search: Search,
    /// Restricts the access level.
    pub kind: Selection<UserKind>,
    /// Restricts to members of one city hall.
    pub city_hall: Option<String>,
}

impl UserQuery {
    /// Returns `true` if `user` passes every filter.
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let found = self.search.is_empty()
            || self.search.in_text(&user.name)
            || self.search.in_identifier(&user.cpf)
            || self.search.in_identifier(&user.phone);

        found
            && self.kind.admits(&user.kind)
            && self
                .city_hall
                .as_deref()
                .is_none_or(|id| user.city_hall_id.as_deref() == Some(id))
    }

    /// The matching users, in input order.
    #[must_use]
    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        users.iter().filter(|user| self.matches(user)).collect()
    }
}

/// Filters for the service-request table.
#[derive(Debug, Clone, Default)]
pub struct RequestQuery {
    /// Matches protocol, category or location.
    pub search: Search,
    /// Restricts the lifecycle state.
    pub status: Selection<RequestStatus>,
    /// Restricts the category, compared case-insensitively.
    pub kind: Selection<String>,
    /// Restricts to one city hall.
    pub city_hall: Option<String>,
}

impl RequestQuery {
    /// Returns `true` if `request` passes every filter.
    #[must_use]
    pub fn matches(&self, request: &ServiceRequest) -> bool {
        let found = self.search.is_empty()
            || self.search.in_text(&request.protocol)
            || self.search.in_text(&request.kind)
            || self.search.in_text(&request.location);

        let kind = match &self.kind {
            Selection::All => true,
            Selection::Only(kind) => request.kind.to_lowercase() == kind.to_lowercase(),
        };

        found
            && kind
            && self.status.admits(&request.status)
            && self
                .city_hall
                .as_deref()
                .is_none_or(|id| request.city_hall_id == id)
    }

    /// The matching requests, in input order.
    #[must_use]
    pub fn apply<'a>(&self, requests: &'a [ServiceRequest]) -> Vec<&'a ServiceRequest> {
        requests.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Filters for the city-hall table.
#[derive(Debug, Clone, Default)]
pub struct CityHallQuery {
    /// Matches name or city.
    pub search: Search,
    /// Restricts the state code (UF), compared case-insensitively.
    pub state: Selection<String>,
    /// Hides city halls that are not live.
    pub active_only: bool,
}

impl CityHallQuery {
    /// Returns `true` if `hall` passes every filter.
    #[must_use]
    pub fn matches(&self, hall: &CityHall) -> bool {
        let found = self.search.is_empty()
            || self.search.in_text(&hall.name)
            || self.search.in_text(&hall.city);

        let state = match &self.state {
            Selection::All => true,
            Selection::Only(state) => hall.state.eq_ignore_ascii_case(state),
        };

        found && state && (!self.active_only || hall.active)
    }

    /// The matching city halls, in input order.
    #[must_use]
    pub fn apply<'a>(&self, halls: &'a [CityHall]) -> Vec<&'a CityHall> {
        halls.iter().filter(|h| self.matches(h)).collect()
    }
}

/// Selects the notifications a given audience would see.
///
/// A notification without a user id goes to everybody in its scope, and one
/// without a city hall id is platform-wide.
#[derive(Debug, Clone, Default)]
pub struct NotificationQuery {
    /// Only notifications addressed to this user or to everyone.
    pub user: Option<String>,
    /// Only notifications from this city hall, plus platform-wide ones.
    pub city_hall: Option<String>,
    /// Drops platform-wide notifications when a city hall is given.
    pub exclude_global: bool,
    /// Drops notifications already read.
    pub unread_only: bool,
}

impl NotificationQuery {
    /// Returns `true` if `notification` passes every filter.
    #[must_use]
    pub fn matches(&self, notification: &Notification) -> bool {
        let addressed = self.user.as_deref().is_none_or(|user| {
            notification
                .user_id
                .as_deref()
                .is_none_or(|recipient| recipient == user)
        });

        let scoped = self.city_hall.as_deref().is_none_or(|hall| {
            notification
                .city_hall_id
                .as_deref()
                .map_or(!self.exclude_global, |sender| sender == hall)
        });

        addressed && scoped && !(self.unread_only && notification.read)
    }

    /// The matching notifications, in input order.
    #[must_use]
    pub fn apply<'a>(&self, notifications: &'a [Notification]) -> Vec<&'a Notification> {
        notifications.iter().filter(|n| self.matches(n)).collect()
    }
}

/// Requests in `status`.
#[must_use]
pub fn requests_with_status(
    requests: &[ServiceRequest],
    status: RequestStatus,
) -> Vec<&ServiceRequest> {
    requests.iter().filter(|r| r.status == status).collect()
}

/// Requests that are not yet completed.
#[must_use]
pub fn open_requests(requests: &[ServiceRequest]) -> Vec<&ServiceRequest> {
    requests.iter().filter(|r| r.status.is_open()).collect()
}

/// Notifications not yet read.
#[must_use]
pub fn unread_notifications(notifications: &[Notification]) -> Vec<&Notification> {
    notifications.iter().filter(|n| !n.read).collect()
}

/// City halls that are live.
#[must_use]
pub fn active_city_halls(halls: &[CityHall]) -> Vec<&CityHall> {
    halls.iter().filter(|h| h.active).collect()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::model::samples;

    fn ids<'a, T>(records: &[&'a T], id: impl Fn(&'a T) -> &'a str) -> Vec<&'a str> {
        records.iter().map(|r| id(*r)).collect()
    }

    #[test]
    fn selection_parses_sentinels() {
        assert_eq!("todos".parse::<Selection<UserKind>>(), Ok(Selection::All));
        assert_eq!("ALL".parse::<Selection<UserKind>>(), Ok(Selection::All));
        assert_eq!(
            "funcionario".parse::<Selection<UserKind>>(),
            Ok(Selection::Only(UserKind::Staff))
        );
        assert!("prefeito".parse::<Selection<UserKind>>().is_err());
    }

    #[test]
    fn default_user_query_matches_everything() {
        let users = samples::users();
        assert_eq!(UserQuery::default().apply(&users).len(), users.len());
    }

    #[test_case("joão", &["1"]; "name ignores case")]
    #[test_case("SILVA", &["1"]; "name upper case")]
    #[test_case("123.456", &["1"]; "punctuated cpf")]
    #[test_case("123456", &[]; "cpf is not normalised")]
    #[test_case("(21)", &["4"]; "phone area code")]
    #[test_case("", &["1", "2", "3", "4", "5"]; "empty search")]
    #[test_case("santos", &["1"]; "last name")]
    #[test_case("santos ", &[]; "trailing space is searched")]
    #[test_case("   ", &[]; "blank search is searched")]
    fn user_search(term: &str, expected: &[&str]) {
        let users = samples::users();
        let query = UserQuery {
            search: Search::new(term),
            ..UserQuery::default()
        };
        assert_eq!(ids(&query.apply(&users), |u| u.id.as_str()), expected);
    }

    #[test]
    fn user_filters_are_conjunctive() {
        let users = samples::users();
        let query = UserQuery {
            search: Search::new("a"),
            kind: Selection::Only(UserKind::Citizen),
            city_hall: Some("2".to_string()),
        };
        assert_eq!(ids(&query.apply(&users), |u| u.id.as_str()), ["4"]);
    }

    #[test]
    fn requests_by_status_and_city_hall() {
        let requests = samples::requests();
        let query = RequestQuery {
            status: Selection::Only(RequestStatus::InProgress),
            city_hall: Some("1".to_string()),
            ..RequestQuery::default()
        };
        assert_eq!(ids(&query.apply(&requests), |r| r.id.as_str()), ["1"]);
    }

    #[test]
    fn requests_by_category_and_search() {
        let requests = samples::requests();
        let query = RequestQuery {
            kind: Selection::Only("coleta de lixo".to_string()),
            ..RequestQuery::default()
        };
        assert_eq!(ids(&query.apply(&requests), |r| r.id.as_str()), ["3"]);

        let query = RequestQuery {
            search: Search::new("copacabana"),
            ..RequestQuery::default()
        };
        assert_eq!(ids(&query.apply(&requests), |r| r.id.as_str()), ["4"]);
    }

    #[test]
    fn city_halls_by_state_and_activity() {
        let halls = samples::city_halls();
        let query = CityHallQuery {
            state: Selection::Only("mg".to_string()),
            ..CityHallQuery::default()
        };
        assert_eq!(ids(&query.apply(&halls), |h| h.id.as_str()), ["3"]);

        let query = CityHallQuery {
            search: Search::new("rio"),
            active_only: true,
            ..CityHallQuery::default()
        };
        assert_eq!(ids(&query.apply(&halls), |h| h.id.as_str()), ["2"]);
    }

    #[test]
    fn notifications_for_a_citizen() {
        let notifications = samples::notifications();
        let query = NotificationQuery {
            user: Some("1".to_string()),
            city_hall: Some("1".to_string()),
            ..NotificationQuery::default()
        };
        assert_eq!(
            ids(&query.apply(&notifications), |n| n.id.as_str()),
            ["1", "2", "3", "4"]
        );

        let query = NotificationQuery {
            unread_only: true,
            exclude_global: true,
            ..query
        };
        assert_eq!(
            ids(&query.apply(&notifications), |n| n.id.as_str()),
            ["1", "2", "4"]
        );
    }

    #[test]
    fn personal_notifications_are_hidden_from_others() {
        let notifications = samples::notifications();
        let query = NotificationQuery {
            user: Some("2".to_string()),
            city_hall: Some("1".to_string()),
            ..NotificationQuery::default()
        };
        assert!(!query.apply(&notifications).iter().any(|n| n.id == "4"));
    }

    #[test]
    fn helper_predicates() {
        let requests = samples::requests();
        assert_eq!(
            ids(&open_requests(&requests), |r| r.id.as_str()),
            ["1", "3", "4"]
        );
        assert_eq!(
            ids(
                &requests_with_status(&requests, RequestStatus::Completed),
                |r| r.id.as_str()
            ),
            ["2"]
        );
        assert_eq!(unread_notifications(&samples::notifications()).len(), 4);
        assert_eq!(active_city_halls(&samples::city_halls()).len(), 2);
    }
}
