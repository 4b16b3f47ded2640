//! Process bootstrap: logging first, then the database.

use log::info;
use quillnote_core::db::{open_db_with, DbError};
use quillnote_core::{core_version, init_logging, AppConfig, ConfigError, LoggingError};
use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),
    #[error("failed to open database: {0}")]
    Db(#[from] DbError),
}

/// Starts file logging when configured, then opens and migrates the
/// database at `config.database_path`.
pub fn bootstrap(config: &AppConfig) -> Result<Connection, BootstrapError> {
    if let Some(log) = &config.log {
        init_logging(log)?;
    }
    let conn = open_db_with(&config.database_path, config.db_options)?;
    info!(
        "event=bootstrap module=api status=ok core_version={}",
        core_version()
    );
    Ok(conn)
}

/// `bootstrap` with configuration read from the environment.
pub fn bootstrap_from_env() -> Result<Connection, BootstrapError> {
    bootstrap(&AppConfig::from_env()?)
}
