//! Runtime configuration from environment variables.
//!
//! Unset or blank variables fall back to `defaults`. File logging is only
//! configured when `QUILLNOTE_LOG_DIR` is set.

use crate::db::{DbOptions, DEFAULT_BUSY_TIMEOUT_MS};
use crate::logging::LogLevel;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable names.
pub mod env_vars {
    pub const DB_PATH: &str = "QUILLNOTE_DB_PATH";
    pub const BUSY_TIMEOUT_MS: &str = "QUILLNOTE_BUSY_TIMEOUT_MS";
    pub const LOG_LEVEL: &str = "QUILLNOTE_LOG_LEVEL";
    /// Absolute directory for rolling log files.
    pub const LOG_DIR: &str = "QUILLNOTE_LOG_DIR";
}

/// Default values.
pub mod defaults {
    pub const DB_FILE_NAME: &str = "quillnote.sqlite3";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got `{value}`")]
    InvalidNumber { var: &'static str, value: String },
}

/// File logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub log_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub db_options: DbOptions,
    pub log: Option<LogSettings>,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let database_path = read(env_vars::DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(defaults::DB_FILE_NAME));

        let busy_timeout_ms = match read(env_vars::BUSY_TIMEOUT_MS) {
            Some(raw) => parse_positive(env_vars::BUSY_TIMEOUT_MS, raw)?,
            None => DEFAULT_BUSY_TIMEOUT_MS,
        };

        let log = read(env_vars::LOG_DIR).map(|dir| LogSettings {
            level: read(env_vars::LOG_LEVEL)
                .unwrap_or_else(|| LogLevel::default_for_build().as_str().to_string()),
            log_dir: PathBuf::from(dir),
        });

        Ok(Self {
            database_path,
            db_options: DbOptions { busy_timeout_ms },
            log,
        })
    }
}

fn parse_positive(var: &'static str, raw: String) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidNumber { var, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::{env_vars, AppConfig, ConfigError};
    use crate::db::DEFAULT_BUSY_TIMEOUT_MS;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert!(config.database_path.ends_with("quillnote.sqlite3"));
        assert_eq!(config.db_options.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        assert!(config.log.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            (env_vars::DB_PATH, " /var/lib/quillnote/notes.db "),
            (env_vars::BUSY_TIMEOUT_MS, "250"),
            (env_vars::LOG_DIR, "/var/log/quillnote"),
            (env_vars::LOG_LEVEL, "warn"),
        ])
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/quillnote/notes.db"));
        assert_eq!(config.db_options.busy_timeout_ms, 250);
        let log = config.log.unwrap();
        assert_eq!(log.level, "warn");
        assert_eq!(log.log_dir, PathBuf::from("/var/log/quillnote"));
    }

    #[test]
    fn invalid_busy_timeout_is_rejected() {
        for raw in ["0", "-5", "soon"] {
            let err = config_from(&[(env_vars::BUSY_TIMEOUT_MS, raw)]).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidNumber {
                    var: env_vars::BUSY_TIMEOUT_MS,
                    value: raw.to_string(),
                }
            );
        }
    }
}
