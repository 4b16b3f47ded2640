//! Note entity and write-side draft validation.
//!
//! # Responsibility
//! - Define the canonical note record returned by every lifecycle operation.
//! - Own the field length bounds shared by create and update.
//!
//! # Invariants
//! - `owner_id` is set once on insert and never rewritten.
//! - `updated_at >= created_at`, and `deleted_at >= updated_at` when set.
//! - A note is active iff `deleted_at` is `None`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned surrogate key of a note.
pub type NoteId = i64;

/// Identifier of an authenticated user (owner or actor).
pub type UserId = i64;

/// Inclusive title length bounds, in characters.
pub const TITLE_MIN_CHARS: usize = 1;
pub const TITLE_MAX_CHARS: usize = 255;
/// Inclusive content length bounds, in characters.
pub const CONTENT_MIN_CHARS: usize = 6;
pub const CONTENT_MAX_CHARS: usize = 500;

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete tombstone. `None` means the note is active.
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_by: UserId,
    pub updated_by: UserId,
    pub deleted_by: Option<UserId>,
}

impl Note {
    /// Returns whether this note is visible to owner-scoped lookups.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Replaces title/content and records the mutation.
    ///
    /// `updated_at` always moves forward: an `at` that does not pass the
    /// current value is bumped to one microsecond after it.
    pub fn apply_edit(&mut self, draft: NoteDraft, actor: UserId, at: DateTime<Utc>) {
        self.title = draft.title;
        self.content = draft.content;
        self.updated_at = at.max(self.updated_at + Duration::microseconds(1));
        self.updated_by = actor;
    }

    /// Tombstones this note.
    ///
    /// The mutation instant is also written to `updated_at`/`updated_by`, so
    /// `deleted_at == updated_at` right after the call.
    pub fn mark_deleted(&mut self, actor: UserId, at: DateTime<Utc>) {
        let at = at.max(self.updated_at);
        self.updated_at = at;
        self.updated_by = actor;
        self.deleted_at = Some(at);
        self.deleted_by = Some(actor);
    }
}

/// Insert payload; the store assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl NewNote {
    /// Builds an active note owned and authored by `owner_id`.
    pub fn new(owner_id: UserId, draft: NoteDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            owner_id,
            title: draft.title,
            content: draft.content,
            created_at,
        }
    }
}

/// Title/content pair accepted by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Checks the field length bounds.
    ///
    /// Upstream request validation normally rejects bad input first; this is
    /// the core's own check.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        let title_len = self.title.chars().count();
        if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title_len) {
            return Err(NoteValidationError::TitleLength {
                actual: title_len,
                min: TITLE_MIN_CHARS,
                max: TITLE_MAX_CHARS,
            });
        }

        let content_len = self.content.chars().count();
        if !(CONTENT_MIN_CHARS..=CONTENT_MAX_CHARS).contains(&content_len) {
            return Err(NoteValidationError::ContentLength {
                actual: content_len,
                min: CONTENT_MIN_CHARS,
                max: CONTENT_MAX_CHARS,
            });
        }

        Ok(())
    }
}

/// Field constraint violations for note drafts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteValidationError {
    #[error("title must be between {min} and {max} characters, got {actual}")]
    TitleLength { actual: usize, min: usize, max: usize },
    #[error("content must be between {min} and {max} characters, got {actual}")]
    ContentLength { actual: usize, min: usize, max: usize },
}
