//! Configuration loading
//!
//! The configuration file is located through an environment variable and
//! deserialized into [`Config`]. Every key has a default, so a file only
//! needs to list what it changes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cleaner_schema::TableAndKey;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the path to the configuration file.
pub const CONFIG_FILE_ENV: &str = "CLUSTER_CLEANER_CONFIG_FILE";

/// Older name of [`CONFIG_FILE_ENV`], still honored when the new one is unset.
pub const LEGACY_CONFIG_FILE_ENV: &str = "INSIGHTS_RESULTS_CLEANER_CONFIG_FILE";

/// Configuration file used when neither variable is set.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

const DAY: u64 = 24 * 60 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("cleaner.tables must list at least one table")]
    NoTables,
}

/// Top-level configuration, mirrors the TOML file layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage: StorageConfig,
    pub cleaner: CleanerConfig,
    pub logging: LoggingConfig,
}

/// `[storage]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("aggregator.db"),
        }
    }
}

/// `[cleaner]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanerConfig {
    /// Clusters whose newest report is older than this are stale
    #[serde(with = "humantime_serde")]
    pub max_age: Duration,
    /// File with one cluster ID per line, consumed by cleanup
    pub cluster_list_file: PathBuf,
    /// Dependent tables in deletion order
    pub tables: Vec<TableAndKey>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(90 * DAY),
            cluster_list_file: PathBuf::from("cluster_list.txt"),
            tables: TableAndKey::defaults(),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Human-readable console output at debug level instead of JSON lines
    pub debug: bool,
}

impl Config {
    /// Load configuration from a specific file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_at(&content, path)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::parse_at(content, Path::new("<inline>"))
    }

    fn parse_at(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        if config.cleaner.tables.is_empty() {
            return Err(ConfigError::NoTables);
        }
        Ok(config)
    }
}

/// Configuration file path taken from the process environment.
pub fn config_file() -> PathBuf {
    config_path(|name| std::env::var_os(name))
}

/// Resolve the configuration file path, looking variables up through `lookup`.
///
/// [`CONFIG_FILE_ENV`] wins over [`LEGACY_CONFIG_FILE_ENV`]; empty values
/// count as unset.
pub fn config_path(lookup: impl Fn(&str) -> Option<OsString>) -> PathBuf {
    [CONFIG_FILE_ENV, LEGACY_CONFIG_FILE_ENV]
        .into_iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
}
