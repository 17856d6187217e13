use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::consts::{
    DEFAULT_DESTINATION, DEFAULT_LOG_FILENAME, DEFAULT_ORIGIN, PLACEHOLDER_API_KEY,
};
use crate::directions::Query;
use crate::error::AppError;
use crate::sink::Schema;
use crate::utils::Timezone;

/// On-disk configuration. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    #[serde(default)]
    pub(crate) origin: Option<String>,
    #[serde(default)]
    pub(crate) destination: Option<String>,
    #[serde(default)]
    pub(crate) log_file: Option<PathBuf>,
    #[serde(default)]
    pub(crate) schema: Option<Schema>,
    #[serde(default)]
    pub(crate) log_failures: Option<bool>,
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
}

impl Config {
    /// An explicit path must exist and parse. Default locations are tried in
    /// order and skipped with a warning when unparseable.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            let config = Self::from_path(path)?;
            tracing::debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        for path in Self::get_config_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_path(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    return Ok(config);
                }
                Err(e) => eprintln!("Warning: {e}"),
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn from_path(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/routelog/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("routelog").join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support, Windows AppData)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("routelog").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.routelog.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".routelog.toml"));
        }

        paths
    }
}

/// Fully resolved run settings, passed explicitly into each component.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) api_key: String,
    pub(crate) query: Query,
    pub(crate) log_file: PathBuf,
    pub(crate) schema: Schema,
    pub(crate) log_failures: bool,
    pub(crate) timeout: Option<Duration>,
    pub(crate) timezone: Timezone,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: PLACEHOLDER_API_KEY.to_string(),
            query: Query::new(DEFAULT_ORIGIN, DEFAULT_DESTINATION),
            log_file: PathBuf::from(DEFAULT_LOG_FILENAME),
            schema: Schema::default(),
            log_failures: true,
            timeout: None,
            timezone: Timezone::Local,
        }
    }
}

impl Settings {
    /// Layer config file values over defaults, then CLI flags over both.
    pub(crate) fn resolve(cli: &Cli, config: Config) -> Result<Self, AppError> {
        let defaults = Self::default();

        let timezone_raw = cli.timezone.as_deref().or(config.timezone.as_deref());
        let timezone = Timezone::parse(timezone_raw)?;

        let origin = config.origin.unwrap_or(defaults.query.origin);
        let destination = config.destination.unwrap_or(defaults.query.destination);

        Ok(Self {
            api_key: config
                .api_key
                .map(|k| k.trim().to_string())
                .unwrap_or(defaults.api_key),
            query: Query::new(origin, destination),
            log_file: cli
                .output
                .clone()
                .or(config.log_file)
                .unwrap_or(defaults.log_file),
            schema: cli.schema.or(config.schema).unwrap_or(defaults.schema),
            log_failures: !cli.skip_failures
                && config.log_failures.unwrap_or(defaults.log_failures),
            timeout: config.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
            timezone,
        })
    }
}
