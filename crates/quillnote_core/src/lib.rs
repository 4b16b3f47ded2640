//! Core domain logic for Quillnote.
//! This crate is the single source of truth for note lifecycle invariants.

pub mod caller;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use caller::{CallerContext, CallerError};
pub use clock::{Clock, SystemClock};
pub use config::{AppConfig, ConfigError, LogSettings};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::note::{NewNote, Note, NoteDraft, NoteId, NoteValidationError, UserId};
pub use repo::note_filter::NoteFilter;
pub use repo::note_repo::{NoteStore, RepoError, RepoResult, SqliteNoteStore, TxMode};
pub use service::note_service::{
    ErrorKind, ListNotesQuery, NotePage, NoteService, NoteServiceError,
};
pub use service::pagination::{PageMeta, PageRequest, PageWindow, PaginationError};
pub use service::uniqueness::title_in_use;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
