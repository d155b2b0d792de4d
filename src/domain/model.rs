//! Records the portal reads from its fixtures.
//!
//! Field names are snake_case; enumerated values keep the labels the portal
//! stores (`cidadao`, `andamento`, ...), which are also what the command line
//! accepts.

use std::{collections::BTreeMap, fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::color::{self, Contrast};

/// An enumerated label that was not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{label}'")]
pub struct UnknownLabel {
    kind: &'static str,
    label: String,
}

macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The stored label.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($label => Ok(Self::$variant),)+
                    _ => Err(UnknownLabel {
                        kind: $kind,
                        label: s.to_string(),
                    }),
                }
            }
        }
    };
}

labelled_enum! {
    /// Access level of a portal user.
    pub enum UserKind ("user kind") {
        /// A resident using the public app.
        Citizen => "cidadao",
        /// City-hall staff handling requests.
        Staff => "funcionario",
        /// Administrator of a single city hall.
        CityHallAdmin => "admin_prefeitura",
        /// Platform-wide administrator.
        SuperAdmin => "super_admin",
    }
}

labelled_enum! {
    /// Lifecycle state of a service request.
    pub enum RequestStatus ("request status") {
        /// Received, not yet picked up.
        Pending => "pendente",
        /// Being worked on.
        InProgress => "andamento",
        /// Resolved.
        Completed => "concluida",
        /// Withdrawn or rejected.
        Cancelled => "cancelada",
    }
}

impl RequestStatus {
    /// `true` for every status except [`RequestStatus::Completed`].
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Completed)
    }
}

labelled_enum! {
    /// Urgency of a service request.
    pub enum Priority ("priority") {
        /// Can wait.
        Low => "baixa",
        /// Normal handling.
        Medium => "media",
        /// Handle soon.
        High => "alta",
        /// Handle immediately.
        Urgent => "urgente",
    }
}

labelled_enum! {
    /// Urgency of a notification.
    pub enum NotificationPriority ("notification priority") {
        /// Informational.
        Low => "baixa",
        /// Normal.
        Medium => "media",
        /// Shown prominently.
        High => "alta",
    }
}

labelled_enum! {
    /// Category of a municipal event.
    pub enum EventKind ("event kind") {
        /// Shows, festivals and exhibitions.
        Cultural => "cultural",
        /// Sports.
        Sports => "esportivo",
        /// Official sessions and ceremonies.
        Official => "oficial",
        /// Health campaigns.
        Health => "saude",
        /// Education.
        Education => "educacao",
    }
}

labelled_enum! {
    /// Category of a notification.
    pub enum NotificationKind ("notification kind") {
        /// Civil-defence alerts.
        Emergency => "emergencia",
        /// Public announcements.
        Announcement => "comunicado",
        /// Reminders about the user's own requests or events.
        Reminder => "lembrete",
        /// Platform messages.
        System => "sistema",
    }
}

labelled_enum! {
    /// A delivery channel for notifications.
    pub enum Channel ("channel") {
        /// In-app inbox.
        App => "app",
        /// Text message.
        Sms => "sms",
        /// E-mail.
        Email => "email",
        /// Push notification.
        Push => "push",
    }
}

labelled_enum! {
    /// The external system an integration talks to.
    pub enum IntegrationKind ("integration kind") {
        /// Property tax.
        Iptu => "iptu",
        /// Protocol / case tracking.
        Protocol => "protocolo",
        /// Health system.
        Health => "saude",
        /// Education system.
        Education => "educacao",
        /// Anything else.
        Other => "outros",
    }
}

labelled_enum! {
    /// A portal module a city hall can switch on.
    pub enum Module ("module") {
        /// Service requests.
        Requests => "solicitacoes",
        /// Ombudsman.
        Ombudsman => "ouvidoria",
        /// Municipal calendar.
        Calendar => "agenda",
        /// Health appointments and campaigns.
        Health => "saude",
        /// School enrolment and communication.
        Education => "educacao",
        /// Taxes and fees.
        Taxes => "tributos",
        /// Public transport.
        Mobility => "mobilidade",
        /// Tourism and culture.
        Tourism => "turismo",
        /// Public spending transparency.
        Transparency => "transparencia",
    }
}

/// A portal account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Record id.
    pub id: String,
    /// Full name.
    pub name: String,
    /// CPF as entered, usually punctuated.
    pub cpf: String,
    /// Phone as entered, usually punctuated.
    pub phone: String,
    /// Contact e-mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// City of residence.
    pub city: String,
    /// Neighbourhood of residence.
    pub neighbourhood: String,
    /// Access level.
    pub kind: UserKind,
    /// The city hall the user belongs to. Platform administrators have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_hall_id: Option<String>,
    /// Whether the account is enabled.
    pub active: bool,
    /// Creation timestamp.
    pub created: String,
    /// Most recent sign-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_access: Option<String>,
}

/// A participating municipality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityHall {
    /// Record id.
    pub id: String,
    /// Official name.
    pub name: String,
    /// Municipality name.
    pub city: String,
    /// Two-letter state code (UF).
    pub state: String,
    /// CNPJ as entered, usually punctuated.
    pub cnpj: String,
    /// Current mayor.
    pub mayor: String,
    /// Theme colour, `#RRGGBB`.
    pub primary_color: String,
    /// Accent colour, `#RRGGBB`.
    pub secondary_color: String,
    /// Whether the city hall is live on the portal.
    pub active: bool,
    /// Creation timestamp.
    pub created: String,
    /// Modules and integrations.
    #[serde(default)]
    pub settings: CityHallSettings,
    /// Public contact details.
    pub contact: Contact,
}

impl CityHall {
    /// Returns `true` if the city hall has switched `module` on.
    #[must_use]
    pub fn has_module(&self, module: Module) -> bool {
        self.settings.active_modules.contains(&module)
    }

    /// Text contrast for the primary colour.
    #[must_use]
    pub fn text_contrast(&self) -> Contrast {
        color::contrast(&self.primary_color)
    }

    /// Integrations currently switched on.
    pub fn active_integrations(&self) -> impl Iterator<Item = &Integration> {
        self.settings.integrations.iter().filter(|i| i.active)
    }
}

/// Per-city-hall portal settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CityHallSettings {
    /// Enabled modules.
    #[serde(default)]
    pub active_modules: Vec<Module>,
    /// Connected external systems.
    #[serde(default)]
    pub integrations: Vec<Integration>,
    /// Maximum number of accounts.
    #[serde(default)]
    pub user_limit: u32,
}

/// Public contact details of a city hall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Switchboard phone.
    pub phone: String,
    /// Contact e-mail.
    pub email: String,
    /// Street address.
    pub address: String,
}

/// A connection to an external municipal system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    /// Record id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Kind of system.
    pub kind: IntegrationKind,
    /// Base URL.
    pub url: String,
    /// Credential, when the system needs one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Whether calls are enabled.
    pub active: bool,
    /// System-specific settings.
    #[serde(default)]
    pub settings: IntegrationSettings,
}

/// Open key/value settings of an [`Integration`].
///
/// Any key is accepted. The keys the portal itself understands have typed
/// accessors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrationSettings(BTreeMap<String, Value>);

impl IntegrationSettings {
    /// API version of the remote system, e.g. `v2`.
    pub const VERSION: &'static str = "versao";
    /// Request timeout in milliseconds.
    pub const TIMEOUT: &'static str = "timeout";
    /// Map of operation name to path.
    pub const ENDPOINTS: &'static str = "endpoints";
    /// Name of the remote product.
    pub const SYSTEM: &'static str = "sistema";
    /// Alternative spelling of the API version used by some systems.
    pub const API_VERSION: &'static str = "api_version";

    /// Every key with a typed accessor.
    pub const KNOWN_KEYS: &'static [&'static str] = &[
        Self::VERSION,
        Self::TIMEOUT,
        Self::ENDPOINTS,
        Self::SYSTEM,
        Self::API_VERSION,
    ];

    /// Raw value of any key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets a key, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// API version, from `versao` or else `api_version`.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.get(Self::VERSION)
            .or_else(|| self.get(Self::API_VERSION))
            .and_then(Value::as_str)
    }

    /// Request timeout, when set to a non-negative integer of milliseconds.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.get(Self::TIMEOUT)
            .and_then(Value::as_u64)
            .map(Duration::from_millis)
    }

    /// Operation name to path. Non-string entries are skipped.
    #[must_use]
    pub fn endpoints(&self) -> BTreeMap<&str, &str> {
        self.get(Self::ENDPOINTS)
            .and_then(Value::as_object)
            .map(|endpoints| {
                endpoints
                    .iter()
                    .filter_map(|(name, path)| Some((name.as_str(), path.as_str()?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Name of the remote product.
    #[must_use]
    pub fn system(&self) -> Option<&str> {
        self.get(Self::SYSTEM).and_then(Value::as_str)
    }

    /// Keys without a typed accessor.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|key| !Self::KNOWN_KEYS.contains(key))
    }
}

/// A point on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// A citizen's rating of a resolved request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Score from 1 to 5.
    pub score: u8,
    /// Free-text comment.
    #[serde(default)]
    pub comment: String,
}

/// A service request filed by a citizen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    /// Record id.
    pub id: String,
    /// Protocol number shown to the citizen.
    pub protocol: String,
    /// Free-text category, e.g. "Iluminação Pública".
    pub kind: String,
    /// What the citizen reported.
    pub description: String,
    /// Lifecycle state.
    pub status: RequestStatus,
    /// Urgency.
    pub priority: Priority,
    /// Filing timestamp.
    pub date: String,
    /// Last change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Where the problem is.
    pub location: String,
    /// Map position of the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Attached photo paths.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    /// Filing user.
    pub user_id: String,
    /// Owning city hall.
    pub city_hall_id: String,
    /// Staff member handling the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    /// Staff notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// The citizen's rating once resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// A municipal event on the public calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Record id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Start date.
    pub date: String,
    /// End date of multi-day events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Venue name.
    pub venue: String,
    /// Venue address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Category.
    pub kind: EventKind,
    /// Owning city hall.
    pub city_hall_id: String,
    /// Who runs the event.
    pub organiser: String,
    /// Maximum attendance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Whether sign-ups are accepted.
    pub registrations_open: bool,
    /// Whether attendance is free.
    pub free: bool,
    /// Ticket price in reais.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Whether the event is listed.
    pub active: bool,
}

/// A message pushed to citizens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Record id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Body.
    pub message: String,
    /// Category.
    pub kind: NotificationKind,
    /// Urgency.
    pub priority: NotificationPriority,
    /// Sending date.
    pub date: String,
    /// After this date the notification is no longer shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    /// Sending city hall; `None` for platform-wide notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_hall_id: Option<String>,
    /// Recipient; `None` for everyone in scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Whether the recipient has read it.
    pub read: bool,
    /// Delivery channels.
    #[serde(default)]
    pub channels: Vec<Channel>,
}

/// The bundled sample fixtures, for tests across the crate.
#[cfg(test)]
pub(crate) mod samples {
    use super::{CityHall, Event, Notification, ServiceRequest, User};

    pub fn users() -> Vec<User> {
        serde_yaml::from_str(include_str!("../../fixtures/users.yaml")).unwrap()
    }

    pub fn city_halls() -> Vec<CityHall> {
        serde_yaml::from_str(include_str!("../../fixtures/city_halls.yaml")).unwrap()
    }

    pub fn requests() -> Vec<ServiceRequest> {
        serde_yaml::from_str(include_str!("../../fixtures/requests.yaml")).unwrap()
    }

    pub fn events() -> Vec<Event> {
        serde_yaml::from_str(include_str!("../../fixtures/events.yaml")).unwrap()
    }

    pub fn notifications() -> Vec<Notification> {
        serde_yaml::from_str(include_str!("../../fixtures/notifications.yaml")).unwrap()
    }
}
