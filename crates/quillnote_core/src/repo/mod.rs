//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the note store contract used by lifecycle operations.
//! - Isolate SQLite query details from service orchestration.
//! - Keep the soft-delete predicate in exactly one place (`note_filter`).

pub mod note_filter;
pub mod note_repo;
