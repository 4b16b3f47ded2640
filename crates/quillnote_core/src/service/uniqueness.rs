//! Active-title uniqueness guard.
//!
//! Create consults the guard unconditionally; update only when the title
//! changes. The lookup is keyed on (owner, title) and does not exclude any
//! note id, so a note's own title always reports as in use. The partial
//! unique index on `notes` backs this check up at write time.

use crate::model::note::UserId;
use crate::repo::note_repo::{NoteStore, RepoResult};

/// Returns whether `owner_id` already has an active note titled `title`.
pub fn title_in_use<S: NoteStore>(store: &S, owner_id: UserId, title: &str) -> RepoResult<bool> {
    Ok(store
        .find_by_owner_and_title(owner_id, title, true)?
        .is_some())
}
