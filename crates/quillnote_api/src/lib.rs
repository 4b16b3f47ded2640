//! Request facade for Quillnote.
//!
//! # Responsibility
//! - Resolve the caller, run exactly one lifecycle operation and map the
//!   outcome onto the `{status, message, data}` envelope.
//! - Bootstrap logging and the database from `AppConfig`.
//!
//! # Invariants
//! - Handlers never panic and never leak internal error detail.
//! - Status codes: 200 success, 400 conflict/validation, 401 unauthorized,
//!   404 not found, 500 internal.

pub mod bootstrap;
pub mod envelope;
pub mod handlers;
pub mod requests;

pub use bootstrap::{bootstrap, bootstrap_from_env, BootstrapError};
pub use envelope::{status_code_for, ApiResponse, Envelope, ResponseStatus};
pub use handlers::NotesApi;
pub use requests::{parse_json_body, CreateNoteRequest, ReadAllNoteQuery, UpdateNoteRequest};
