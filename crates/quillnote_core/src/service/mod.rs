//! Note use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the note lifecycle operations.
//! - Keep request facades decoupled from storage details.

pub mod note_service;
pub mod pagination;
pub mod uniqueness;
