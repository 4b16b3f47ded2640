//! Row filters shared by every note query.
//!
//! # Invariants
//! - The active-scope predicate (`deleted_at IS NULL`) is rendered only by
//!   this module. Store queries build their `WHERE` clause from a
//!   `NoteFilter` and never spell the predicate themselves.
//! - Count and page queries built from the same filter select the same rows.

use crate::model::note::UserId;
use rusqlite::types::Value;

const ACTIVE_SCOPE_SQL: &str = "deleted_at IS NULL";

/// Owner and soft-delete restrictions for a note query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Restrict to one owner. `None` spans all owners.
    pub owner_id: Option<UserId>,
    /// Include tombstoned notes.
    pub include_deleted: bool,
}

impl NoteFilter {
    /// Active notes across every owner.
    pub fn active() -> Self {
        Self::default()
    }

    /// Active notes of one owner.
    pub fn active_for(owner_id: UserId) -> Self {
        Self {
            owner_id: Some(owner_id),
            include_deleted: false,
        }
    }

    /// Filter used by the list operation.
    ///
    /// Both flags compose with AND: `filter_user` adds the owner
    /// restriction, `!include_deleted` adds the active scope.
    pub fn for_listing(caller_id: UserId, filter_user: bool, include_deleted: bool) -> Self {
        Self {
            owner_id: filter_user.then_some(caller_id),
            include_deleted,
        }
    }

    pub(crate) fn predicate(&self) -> SqlPredicate {
        let mut predicate = SqlPredicate::default();
        if let Some(owner_id) = self.owner_id {
            predicate = predicate.and_bind("owner_id = ?", Value::Integer(owner_id));
        }
        if !self.include_deleted {
            predicate = predicate.and(ACTIVE_SCOPE_SQL);
        }
        predicate
    }
}

/// `WHERE` clause fragments plus their positional bind values.
#[derive(Debug, Clone, Default)]
pub(crate) struct SqlPredicate {
    clauses: Vec<&'static str>,
    binds: Vec<Value>,
}

impl SqlPredicate {
    pub(crate) fn and(mut self, clause: &'static str) -> Self {
        self.clauses.push(clause);
        self
    }

    pub(crate) fn and_bind(mut self, clause: &'static str, value: Value) -> Self {
        self.clauses.push(clause);
        self.binds.push(value);
        self
    }

    /// Renders ` WHERE a AND b`, or an empty string when unrestricted.
    pub(crate) fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub(crate) fn into_binds(self) -> Vec<Value> {
        self.binds
    }
}
