//! Note domain model.
//!
//! # Invariants
//! - Every note is identified by a store-assigned `NoteId`.
//! - Deletion is represented by a `deleted_at` tombstone, never a hard delete.

pub mod note;
