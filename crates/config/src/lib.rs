#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for snapfind
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/snapfind/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;

use serde::{Deserialize, Serialize};
use snapfind_errors::{ConfigError, Error};
use snapfind_types::{ColorChoice, RankBy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub probe: ProbeSettings,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub download: DownloadConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub color: ColorChoice,
}

/// Where the providers catalog comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,
    #[serde(default = "default_catalog_timeout")]
    pub timeout: u64, // seconds
}

/// Health and throughput probe limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSettings {
    #[serde(default = "default_health_timeout")]
    pub health_timeout: u64, // seconds
    #[serde(default = "default_speed_test_window")]
    pub speed_test_window: u64, // seconds
    /// Upper bound on simultaneous probes, 0 = one task per candidate
    #[serde(default)]
    pub max_concurrency: usize,
}

/// Candidate ranking
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SelectionConfig {
    #[serde(default)]
    pub rank_by: RankBy,
}

/// Download destination
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DownloadConfig {
    pub dir: Option<PathBuf>,
}

// Default implementations

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            timeout: default_catalog_timeout(),
        }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            health_timeout: default_health_timeout(),
            speed_test_window: default_speed_test_window(),
            max_concurrency: 0,
        }
    }
}

impl ProbeSettings {
    #[must_use]
    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout)
    }

    #[must_use]
    pub fn speed_test_window(&self) -> Duration {
        Duration::from_secs(self.speed_test_window)
    }
}

impl CatalogConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

// Default value functions for serde
fn default_catalog_url() -> String {
    constants::DEFAULT_CATALOG_URL.to_string()
}

fn default_catalog_timeout() -> u64 {
    10
}

fn default_health_timeout() -> u64 {
    3
}

fn default_speed_test_window() -> u64 {
    10
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::CONFIG_DIR_NAME)
            .join("config.toml"))
    }

    /// Directory debug log files are written to
    #[must_use]
    pub fn log_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| {
            dir.join(constants::CONFIG_DIR_NAME)
                .join(constants::LOG_DIR_NAME)
        })
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value of the wrong shape.
    pub fn merge_env_from<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SNAPFIND_CATALOG_URL") {
            self.catalog.url = url;
        }

        if let Some(dir) = lookup("SNAPFIND_DOWNLOAD_DIR") {
            self.download.dir = Some(PathBuf::from(dir));
        }

        if let Some(secs) = lookup("SNAPFIND_HEALTH_TIMEOUT") {
            self.probe.health_timeout = parse_seconds("SNAPFIND_HEALTH_TIMEOUT", secs)?;
        }

        if let Some(secs) = lookup("SNAPFIND_SPEED_TEST_WINDOW") {
            self.probe.speed_test_window = parse_seconds("SNAPFIND_SPEED_TEST_WINDOW", secs)?;
        }

        if let Some(rank) = lookup("SNAPFIND_RANK_BY") {
            self.selection.rank_by = rank.parse().map_err(|value| ConfigError::InvalidValue {
                field: "SNAPFIND_RANK_BY".to_string(),
                value,
            })?;
        }

        // SNAPFIND_COLOR
        if let Some(color) = lookup("SNAPFIND_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "SNAPFIND_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        self.validate()
    }

    /// Reject values the probes cannot work with
    ///
    /// # Errors
    ///
    /// Returns an error if a probe duration is zero or longer than
    /// [`constants::MAX_PROBE_SECS`].
    pub fn validate(&self) -> Result<(), Error> {
        check_probe_secs("probe.health_timeout", self.probe.health_timeout)?;
        check_probe_secs("probe.speed_test_window", self.probe.speed_test_window)
    }

    /// Resolve the directory snapshots are downloaded into
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the home
    /// directory cannot be determined.
    pub fn download_dir(&self) -> Result<PathBuf, Error> {
        let home = dirs::home_dir();
        match &self.download.dir {
            Some(dir) => Ok(expand_home(dir, home.as_deref())),
            None => home
                .map(|h| h.join(constants::DEFAULT_DOWNLOAD_DIR_NAME))
                .ok_or_else(|| {
                    ConfigError::MissingField {
                        field: "download.dir".to_string(),
                    }
                    .into()
                }),
        }
    }
}

fn check_probe_secs(field: &str, secs: u64) -> Result<(), Error> {
    if secs == 0 || secs > constants::MAX_PROBE_SECS {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: secs.to_string(),
        }
        .into());
    }
    Ok(())
}

fn parse_seconds(field: &str, value: String) -> Result<u64, Error> {
    value.trim().parse().map_err(|_| {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        }
        .into()
    })
}

fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
