use quillnote_api::{bootstrap, BootstrapError};
use quillnote_core::db::DbOptions;
use quillnote_core::{AppConfig, LogSettings, SqliteNoteStore};

#[test]
fn bootstrap_opens_a_migrated_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        database_path: dir.path().join("notes.sqlite3"),
        db_options: DbOptions::default(),
        log: None,
    };

    let conn = bootstrap(&config).unwrap();

    assert!(SqliteNoteStore::try_new(&conn).is_ok());
    assert!(config.database_path.exists());
}

#[test]
fn bootstrap_rejects_relative_log_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        database_path: dir.path().join("notes.sqlite3"),
        db_options: DbOptions::default(),
        log: Some(LogSettings {
            level: "info".to_string(),
            log_dir: "relative/logs".into(),
        }),
    };

    let err = bootstrap(&config).unwrap_err();

    assert!(matches!(err, BootstrapError::Logging(_)));
    assert!(!config.database_path.exists());
}
