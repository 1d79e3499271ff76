//! Runtime configuration for composition roots.
//!
//! # Responsibility
//! - Resolve database path, blob name, logging and debounce settings.
//! - Read `DAYPLANNER_*` environment overrides on top of defaults.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - Resolution never touches the file system.

use crate::logging::default_log_level;
use crate::store::DEFAULT_STORAGE_KEY;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "DAYPLANNER_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "DAYPLANNER_STORAGE_KEY";
pub const ENV_LOG_LEVEL: &str = "DAYPLANNER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "DAYPLANNER_LOG_DIR";
pub const ENV_NOTES_DEBOUNCE_MS: &str = "DAYPLANNER_NOTES_DEBOUNCE_MS";

const DEFAULT_DB_FILE_NAME: &str = "dayplanner.sqlite3";
const DEFAULT_NOTES_DEBOUNCE_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative integer, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub db_path: PathBuf,
    pub storage_key: String,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// Quiet period before buffered notes are committed.
    pub notes_debounce: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            notes_debounce: Duration::from_millis(DEFAULT_NOTES_DEBOUNCE_MS),
        }
    }
}

impl PlannerConfig {
    /// Defaults overridden by process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = value(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = value(ENV_STORAGE_KEY) {
            config.storage_key = key;
        }
        if let Some(level) = value(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = value(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = value(ENV_NOTES_DEBOUNCE_MS) {
            let millis = raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                key: ENV_NOTES_DEBOUNCE_MS,
                value: raw.clone(),
            })?;
            config.notes_debounce = Duration::from_millis(millis);
        }
        Ok(config)
    }
}
