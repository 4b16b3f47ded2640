//! Note lifecycle service.
//!
//! # Responsibility
//! - Provide create/read-one/list/update/delete for the calling user.
//! - Enforce ownership, active-title uniqueness and soft-delete semantics.
//!
//! # Invariants
//! - Every operation runs in one store transaction. Writes take the write
//!   lock before their existence/uniqueness checks.
//! - Read-one, update and delete only see the caller's active notes.
//! - List count and page share one `NoteFilter` and one snapshot.
//! - No operation retries on failure.

use crate::caller::CallerError;
use crate::clock::{Clock, SystemClock};
use crate::model::note::{NewNote, Note, NoteDraft, NoteId, NoteValidationError, UserId};
use crate::repo::note_filter::NoteFilter;
use crate::repo::note_repo::{NoteStore, RepoError, TxMode};
use crate::service::pagination::{PageMeta, PageRequest, PageWindow, PaginationError};
use crate::service::uniqueness::title_in_use;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

/// Failure category of a lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    Conflict,
    Validation,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Service error for note use-cases.
#[derive(Debug, Error)]
pub enum NoteServiceError {
    /// No usable caller identity.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] CallerError),
    /// Note is absent, owned by someone else or already deleted.
    #[error("note not found: {0}")]
    NotFound(NoteId),
    /// The caller already has an active note with this title.
    #[error("Title '{title}' is already used by another note.")]
    Conflict { title: String },
    #[error(transparent)]
    InvalidNote(#[from] NoteValidationError),
    #[error(transparent)]
    InvalidPage(#[from] PaginationError),
    /// Store failure; details stay in logs.
    #[error("note store failure: {0}")]
    Internal(#[source] RepoError),
}

impl NoteServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InvalidNote(_) | Self::InvalidPage(_) => ErrorKind::Validation,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateTitle { title, .. } => Self::Conflict { title },
            RepoError::NotFound(note_id) => Self::NotFound(note_id),
            other => Self::Internal(other),
        }
    }
}

/// Inputs of the list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListNotesQuery {
    pub page: PageRequest,
    /// Include soft-deleted notes.
    pub include_deleted: bool,
    /// Restrict to the caller's own notes.
    pub filter_user: bool,
}

/// One page of notes plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePage {
    pub records: Vec<Note>,
    pub meta: PageMeta,
}

/// Note service facade over store implementations.
pub struct NoteService<S: NoteStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
}

impl<S: NoteStore> NoteService<S> {
    /// Creates a service stamping mutations with the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: NoteStore, C: Clock> NoteService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an active note owned by `caller_id`.
    ///
    /// # Errors
    /// - `InvalidNote` when title/content are out of bounds.
    /// - `Conflict` when the caller already has an active note with this title.
    pub fn create_note(&self, caller_id: UserId, draft: NoteDraft) -> Result<Note, NoteServiceError> {
        let started_at = Instant::now();
        let result = draft.validate().map_err(NoteServiceError::from).and_then(|()| {
            self.store.in_transaction(TxMode::Write, |store| {
                if title_in_use(store, caller_id, &draft.title)? {
                    return Err(NoteServiceError::Conflict { title: draft.title });
                }
                let note = store.insert(&NewNote::new(caller_id, draft, self.clock.now()))?;
                Ok(note)
            })
        });
        log_outcome("note_create", caller_id, started_at, result)
    }

    /// Returns one active note owned by `caller_id`.
    pub fn get_note(&self, caller_id: UserId, note_id: NoteId) -> Result<Note, NoteServiceError> {
        let started_at = Instant::now();
        let result = self.store.in_transaction(TxMode::Read, |store| {
            store
                .find_by_id_owner_active(note_id, caller_id)?
                .ok_or(NoteServiceError::NotFound(note_id))
        });
        log_outcome("note_read_one", caller_id, started_at, result)
    }

    /// Lists one page of notes.
    ///
    /// A page past the end is not an error: it yields no records and still
    /// reports accurate totals.
    pub fn list_notes(
        &self,
        caller_id: UserId,
        query: &ListNotesQuery,
    ) -> Result<NotePage, NoteServiceError> {
        let started_at = Instant::now();
        let filter = NoteFilter::for_listing(caller_id, query.filter_user, query.include_deleted);
        let result = query
            .page
            .validate()
            .map_err(NoteServiceError::from)
            .and_then(|()| {
                self.store.in_transaction(TxMode::Read, |store| {
                    let total_item = store.count(&filter)?;
                    let window = PageWindow::compute(total_item, &query.page)?;
                    let records = if window.is_past_end(total_item) {
                        Vec::new()
                    } else {
                        store.list(&filter, window.offset, window.limit)?
                    };
                    Ok(NotePage {
                        records,
                        meta: PageMeta::new(total_item, &query.page, &window),
                    })
                })
            });
        log_outcome("note_read_all", caller_id, started_at, result)
    }

    /// Replaces title and content of one of the caller's active notes.
    ///
    /// The uniqueness guard only runs when the title changes, and it does not
    /// exclude the note's own id.
    pub fn update_note(
        &self,
        caller_id: UserId,
        note_id: NoteId,
        draft: NoteDraft,
    ) -> Result<Note, NoteServiceError> {
        let started_at = Instant::now();
        let result = draft.validate().map_err(NoteServiceError::from).and_then(|()| {
            self.store.in_transaction(TxMode::Write, |store| {
                let mut note = store
                    .find_by_id_owner_active(note_id, caller_id)?
                    .ok_or(NoteServiceError::NotFound(note_id))?;

                if note.title != draft.title && title_in_use(store, caller_id, &draft.title)? {
                    return Err(NoteServiceError::Conflict { title: draft.title });
                }

                note.apply_edit(draft, caller_id, self.clock.now());
                store.persist(&note)?;
                Ok(note)
            })
        });
        log_outcome("note_update", caller_id, started_at, result)
    }

    /// Soft-deletes one of the caller's active notes and returns its final
    /// state. Deleting an already deleted note fails with `NotFound`.
    pub fn delete_note(&self, caller_id: UserId, note_id: NoteId) -> Result<Note, NoteServiceError> {
        let started_at = Instant::now();
        let result = self.store.in_transaction(TxMode::Write, |store| {
            let mut note = store
                .find_by_id_owner_active(note_id, caller_id)?
                .ok_or(NoteServiceError::NotFound(note_id))?;
            note.mark_deleted(caller_id, self.clock.now());
            store.persist(&note)?;
            Ok(note)
        });
        log_outcome("note_delete", caller_id, started_at, result)
    }
}

// Titles and contents stay out of log lines.
fn log_outcome<T>(
    event: &str,
    caller_id: UserId,
    started_at: Instant,
    result: Result<T, NoteServiceError>,
) -> Result<T, NoteServiceError> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => debug!(
            "event={event} module=note_service status=ok caller_id={caller_id} duration_ms={duration_ms}"
        ),
        Err(NoteServiceError::Internal(err)) => error!(
            "event={event} module=note_service status=error caller_id={caller_id} duration_ms={duration_ms} error_kind=internal error={err}"
        ),
        Err(err) => info!(
            "event={event} module=note_service status=rejected caller_id={caller_id} duration_ms={duration_ms} error_kind={}",
            err.kind().as_str()
        ),
    }
    result
}
