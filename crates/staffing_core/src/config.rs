//! Runtime configuration for embedding applications.
//!
//! # Responsibility
//! - Collect database and logging settings from the environment.
//! - Reject malformed settings before any storage or logger is touched.
//!
//! # Invariants
//! - `log_dir`, when set, is an absolute path.
//! - No `db_path` means an in-memory database.
//! - No `log_dir` means file logging stays off.

use crate::db::{open_db, open_db_in_memory, DbResult};
use log::LevelFilter;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "STAFFING_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "STAFFING_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "STAFFING_LOG_DIR";

/// Configuration parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value is unusable.
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Settings for opening storage and initializing logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file path. `None` opens an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: LevelFilter,
    /// Rolling log directory. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = parse_log_level(&level)?;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            if !Path::new(&dir).is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_LOG_DIR,
                    message: format!("must be an absolute path, got `{dir}`"),
                });
            }
            config.log_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Opens the configured database with migrations applied.
    pub fn open_db(&self) -> DbResult<Connection> {
        match &self.db_path {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

/// `debug` in debug builds, `info` otherwise.
pub fn default_log_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Parses `trace|debug|info|warn|error|off`, case-insensitively; `warning`
/// is accepted for `warn`.
fn parse_log_level(raw: &str) -> Result<LevelFilter, ConfigError> {
    let lowered = raw.to_ascii_lowercase();
    let name = if lowered == "warning" { "warn" } else { lowered.as_str() };
    name.parse::<LevelFilter>()
        .map_err(|_| ConfigError::InvalidValue {
            key: ENV_LOG_LEVEL,
            message: format!("unsupported level `{raw}`; expected trace|debug|info|warn|error|off"),
        })
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use log::LevelFilter;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[(ENV_LOG_DIR, "   ")])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.is_none());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn values_are_normalized() {
        let dir = std::env::temp_dir().join("staffing-config-test");
        let dir_text = dir.to_string_lossy().to_string();
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, " staffing.sqlite3 "),
            (ENV_LOG_LEVEL, " WARNING "),
            (ENV_LOG_DIR, dir_text.as_str()),
        ]))
        .unwrap();

        assert_eq!(config.db_path, Some(PathBuf::from("staffing.sqlite3")));
        assert_eq!(config.log_level, LevelFilter::Warn);
        assert_eq!(config.log_dir, Some(dir));
    }

    #[test]
    fn invalid_level_and_relative_dir_are_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == ENV_LOG_LEVEL));

        let err = CoreConfig::from_lookup(lookup(&[(ENV_LOG_DIR, "logs/dev")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == ENV_LOG_DIR));
    }

    #[test]
    fn default_config_opens_in_memory_database() {
        let conn = CoreConfig::default().open_db().unwrap();
        let version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap();
        assert!(version > 0);
    }
}
