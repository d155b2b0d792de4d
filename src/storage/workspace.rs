//! A portal workspace on disk.
//!
//! A [`Workspace`] is a root directory holding an optional
//! `.cidade/config.toml` and a fixture directory. It starts out
//! [`Unloaded`]; [`Workspace::load`] reads the configuration and every
//! fixture file.

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use crate::{
    domain::Config,
    storage::fixtures::{Fixtures, LoadError},
};

/// Name of the metadata directory under the workspace root.
pub const CONFIG_DIR: &str = ".cidade";

/// Name of the configuration file inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// A workspace whose configuration and fixtures have been read.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    config: Config,
    fixtures: Fixtures,
}

/// A workspace that has not been read yet.
#[derive(Debug, PartialEq, Eq)]
pub struct Unloaded;

/// A portal workspace rooted at a directory.
#[derive(Debug)]
pub struct Workspace<S> {
    root: PathBuf,
    state: S,
}

impl<S> Workspace<S> {
    /// The workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the configuration file lives, whether or not it exists.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_DIR).join(CONFIG_FILE)
    }
}

impl Workspace<Unloaded> {
    /// Opens a workspace at the given path.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self {
            root,
            state: Unloaded,
        }
    }

    /// Reads the configuration (or its defaults) and the fixtures it points
    /// at.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but is invalid, or
    /// if a fixture file cannot be read or parsed.
    pub fn load(self) -> Result<Workspace<Loaded>, WorkspaceError> {
        let config = Config::load_or_default(&self.config_path()).map_err(WorkspaceError::Config)?;
        let fixtures = Fixtures::load(&config.fixtures_dir(&self.root))?;

        Ok(Workspace {
            root: self.root,
            state: Loaded { config, fixtures },
        })
    }

    /// Writes a configuration file, creating the metadata directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace already has a configuration file, or
    /// if the directory or file cannot be written.
    pub fn init(&self, config: &Config) -> Result<PathBuf, WorkspaceError> {
        let path = self.config_path();
        if path.exists() {
            return Err(WorkspaceError::AlreadyInitialised(path));
        }

        let dir = self.root.join(CONFIG_DIR);
        std::fs::create_dir_all(&dir)
            .map_err(|e| WorkspaceError::Config(format!("Failed to create {}: {e}", dir.display())))?;
        config.save(&path).map_err(WorkspaceError::Config)?;

        tracing::info!("Wrote configuration to {}", path.display());
        Ok(path)
    }
}

impl Workspace<Loaded> {
    /// The effective configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.state.config
    }

    /// Every loaded record.
    #[must_use]
    pub const fn fixtures(&self) -> &Fixtures {
        &self.state.fixtures
    }

    /// The records visible to `city_hall`, falling back to the configured
    /// city hall, or every record when neither is set.
    #[must_use]
    pub fn scoped(&self, city_hall: Option<&str>) -> Cow<'_, Fixtures> {
        match city_hall.or(self.state.config.city_hall.as_deref()) {
            Some(id) => {
                tracing::debug!(city_hall = id, "scoping records");
                Cow::Owned(self.state.fixtures.for_city_hall(id))
            }
            None => Cow::Borrowed(&self.state.fixtures),
        }
    }
}

/// Errors raised while opening a [`Workspace`].
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// The configuration could not be read or written.
    #[error("{0}")]
    Config(String),

    /// A fixture file is unreadable or malformed.
    #[error(transparent)]
    Fixtures(#[from] LoadError),

    /// [`Workspace::init`] found an existing configuration file.
    #[error("workspace already initialised (found {})", .0.display())]
    AlreadyInitialised(PathBuf),
}
