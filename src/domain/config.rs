use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::stats::ReportFormat;

/// Workspace configuration for the portal tools.
///
/// Stored as TOML under `.cidade/config.toml`. A missing file means every
/// setting keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The city hall commands are scoped to when none is given.
    ///
    /// `None` means every city hall.
    pub city_hall: Option<String>,

    /// Directory holding the fixture files.
    ///
    /// Relative paths are resolved against the workspace root.
    fixtures: PathBuf,

    /// Default reporting window in days.
    pub report_period_days: u32,

    /// Default export format.
    pub report_format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            city_hall: None,
            fixtures: default_fixtures(),
            report_period_days: default_report_period_days(),
            report_format: ReportFormat::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Loads the configuration, or the defaults if `path` does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, String> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// The fixture directory as configured.
    #[must_use]
    pub fn fixtures(&self) -> &Path {
        &self.fixtures
    }

    /// The fixture directory, resolved against `root` when relative.
    #[must_use]
    pub fn fixtures_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.fixtures)
    }

    /// Points the configuration at another fixture directory.
    pub fn set_fixtures(&mut self, path: impl Into<PathBuf>) {
        self.fixtures = path.into();
    }
}

fn default_fixtures() -> PathBuf {
    PathBuf::from("fixtures")
}

const fn default_report_period_days() -> u32 {
    30
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        city_hall: Option<String>,

        #[serde(default = "default_fixtures")]
        fixtures: PathBuf,

        #[serde(default = "default_report_period_days")]
        report_period_days: u32,

        #[serde(default)]
        report_format: ReportFormat,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                city_hall,
                fixtures,
                report_period_days,
                report_format,
            } => Self {
                city_hall,
                fixtures,
                report_period_days,
                report_format,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            city_hall: config.city_hall,
            fixtures: config.fixtures,
            report_period_days: config.report_period_days,
            report_format: config.report_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\ncity_hall = \"2\"\nfixtures = \"data/rio\"\nreport_period_days = 7\nreport_format = \"csv\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.city_hall.as_deref(), Some("2"));
        assert_eq!(config.fixtures(), Path::new("data/rio"));
        assert_eq!(config.report_period_days, 7);
        assert_eq!(config.report_format, ReportFormat::Csv);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        assert_eq!(Config::load_or_default(&missing), Ok(Config::default()));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nreport_format = \"docx\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(actual.report_period_days, 30);
        assert_eq!(actual.fixtures(), Path::new("fixtures"));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = Config {
            city_hall: Some("1".to_string()),
            report_format: ReportFormat::Excel,
            ..Config::default()
        };
        config.set_fixtures("/srv/fixtures");
        config.save(&path).unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("_version = \"1\""), "{saved}");
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn relative_fixtures_resolve_against_root() {
        let config = Config::default();
        assert_eq!(
            config.fixtures_dir(Path::new("/work")),
            PathBuf::from("/work/fixtures")
        );
    }
}
