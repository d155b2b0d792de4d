//! YAML fixture files.
//!
//! A fixture directory holds one YAML sequence per record type. Any file may
//! be missing, in which case that collection is empty.

use std::{
    io,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;

use crate::domain::model::{CityHall, Event, Notification, ServiceRequest, User};

/// File holding [`User`] records.
pub const USERS_FILE: &str = "users.yaml";
/// File holding [`CityHall`] records.
pub const CITY_HALLS_FILE: &str = "city_halls.yaml";
/// File holding [`ServiceRequest`] records.
pub const REQUESTS_FILE: &str = "requests.yaml";
/// File holding [`Event`] records.
pub const EVENTS_FILE: &str = "events.yaml";
/// File holding [`Notification`] records.
pub const NOTIFICATIONS_FILE: &str = "notifications.yaml";

/// Every record the portal knows about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fixtures {
    /// Accounts.
    pub users: Vec<User>,
    /// Participating municipalities.
    pub city_halls: Vec<CityHall>,
    /// Service requests.
    pub requests: Vec<ServiceRequest>,
    /// Calendar events.
    pub events: Vec<Event>,
    /// Notifications.
    pub notifications: Vec<Notification>,
}

impl Fixtures {
    /// Loads every fixture file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read, or if it is not a
    /// YAML sequence of the expected records.
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        let fixtures = Self {
            users: load_file(&dir.join(USERS_FILE))?,
            city_halls: load_file(&dir.join(CITY_HALLS_FILE))?,
            requests: load_file(&dir.join(REQUESTS_FILE))?,
            events: load_file(&dir.join(EVENTS_FILE))?,
            notifications: load_file(&dir.join(NOTIFICATIONS_FILE))?,
        };

        tracing::debug!(
            users = fixtures.users.len(),
            city_halls = fixtures.city_halls.len(),
            requests = fixtures.requests.len(),
            events = fixtures.events.len(),
            notifications = fixtures.notifications.len(),
            "Loaded fixtures from {}",
            dir.display()
        );

        Ok(fixtures)
    }

    /// Looks up a city hall by id.
    #[must_use]
    pub fn city_hall(&self, id: &str) -> Option<&CityHall> {
        self.city_halls.iter().find(|hall| hall.id == id)
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// The records visible to one city hall.
    ///
    /// Keeps that city hall, its members, requests and events, and its
    /// notifications together with the platform-wide ones.
    #[must_use]
    pub fn for_city_hall(&self, id: &str) -> Self {
        Self {
            users: self
                .users
                .iter()
                .filter(|u| u.city_hall_id.as_deref() == Some(id))
                .cloned()
                .collect(),
            city_halls: self
                .city_halls
                .iter()
                .filter(|h| h.id == id)
                .cloned()
                .collect(),
            requests: self
                .requests
                .iter()
                .filter(|r| r.city_hall_id == id)
                .cloned()
                .collect(),
            events: self
                .events
                .iter()
                .filter(|e| e.city_hall_id == id)
                .cloned()
                .collect(),
            notifications: self
                .notifications
                .iter()
                .filter(|n| n.city_hall_id.as_deref().is_none_or(|hall| hall == id))
                .cloned()
                .collect(),
        }
    }
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No fixture file at {}, using an empty list", path.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_yaml::from_str(&content).map_err(|source| LoadError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Errors returned by [`Fixtures::load`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file exists but could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// The offending file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The file is not a sequence of the expected records.
    #[error("failed to parse {}", path.display())]
    Yaml {
        /// The offending file.
        path: PathBuf,
        /// The underlying error.
        source: serde_yaml::Error,
    },
}
