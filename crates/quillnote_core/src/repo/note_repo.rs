//! Note store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the filtered lookups, counts and writes lifecycle operations
//!   are built from.
//! - Provide a transaction scope so one operation's reads and write commit
//!   together.
//!
//! # Invariants
//! - Every `WHERE` clause is rendered from a `NoteFilter`.
//! - `persist` only touches active rows and never rewrites `owner_id`.
//! - A violation of the active-title unique index surfaces as
//!   `RepoError::DuplicateTitle`.
//! - `list` orders by `id ASC` (insertion order).

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::note::{NewNote, Note, NoteId, UserId};
use crate::repo::note_filter::NoteFilter;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use thiserror::Error;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    title,
    content,
    created_at,
    updated_at,
    deleted_at,
    created_by,
    updated_by,
    deleted_by
FROM notes";

const NOTE_REQUIRED_COLUMNS: &[&str] = &[
    "id",
    "owner_id",
    "title",
    "content",
    "created_at",
    "updated_at",
    "deleted_at",
    "created_by",
    "updated_by",
    "deleted_by",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence errors for note storage.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("note not found: {0}")]
    NotFound(NoteId),
    /// The active-title unique index rejected a write.
    #[error("active note title already in use for owner {owner_id}")]
    DuplicateTitle { owner_id: UserId, title: String },
    #[error("invalid persisted note data: {0}")]
    InvalidData(String),
    #[error("connection schema version {actual_version} does not match expected {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("missing required table `{0}`")]
    MissingRequiredTable(&'static str),
    #[error("missing required column `{table}.{column}`")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Locking intent of a transaction scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// Snapshot reads; no write lock taken up front.
    Read,
    /// Takes the write lock before the first read, serializing
    /// check-then-act sequences across connections.
    Write,
}

impl TxMode {
    fn behavior(self) -> TransactionBehavior {
        match self {
            Self::Read => TransactionBehavior::Deferred,
            Self::Write => TransactionBehavior::Immediate,
        }
    }
}

/// Storage contract for lifecycle operations.
pub trait NoteStore {
    /// Finds one note of `owner_id` titled `title`, optionally active only.
    fn find_by_owner_and_title(
        &self,
        owner_id: UserId,
        title: &str,
        active_only: bool,
    ) -> RepoResult<Option<Note>>;
    /// Finds an active note by id, scoped to its owner.
    fn find_by_id_owner_active(&self, note_id: NoteId, owner_id: UserId)
        -> RepoResult<Option<Note>>;
    /// Counts notes matching `filter`.
    fn count(&self, filter: &NoteFilter) -> RepoResult<u64>;
    /// Lists one window of notes matching `filter`, in insertion order.
    fn list(&self, filter: &NoteFilter, offset: u64, limit: u64) -> RepoResult<Vec<Note>>;
    /// Inserts a new active note and returns it with its assigned id.
    fn insert(&self, note: &NewNote) -> RepoResult<Note>;
    /// Writes title, content, timestamps and actors of an active note.
    fn persist(&self, note: &Note) -> RepoResult<()>;
    /// Runs `f` inside one transaction; commits on `Ok`, rolls back on `Err`.
    fn in_transaction<T, E, F>(&self, mode: TxMode, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed note store.
pub struct SqliteNoteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not the latest.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema was
    ///   tampered with.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteStore for SqliteNoteStore<'_> {
    fn find_by_owner_and_title(
        &self,
        owner_id: UserId,
        title: &str,
        active_only: bool,
    ) -> RepoResult<Option<Note>> {
        let filter = NoteFilter {
            owner_id: Some(owner_id),
            include_deleted: !active_only,
        };
        let predicate = filter
            .predicate()
            .and_bind("title = ?", Value::Text(title.to_string()));
        let sql = format!("{NOTE_SELECT_SQL}{} ORDER BY id ASC LIMIT 1;", predicate.where_sql());
        query_one(self.conn, &sql, predicate.into_binds())
    }

    fn find_by_id_owner_active(
        &self,
        note_id: NoteId,
        owner_id: UserId,
    ) -> RepoResult<Option<Note>> {
        let predicate = NoteFilter::active_for(owner_id)
            .predicate()
            .and_bind("id = ?", Value::Integer(note_id));
        let sql = format!("{NOTE_SELECT_SQL}{};", predicate.where_sql());
        query_one(self.conn, &sql, predicate.into_binds())
    }

    fn count(&self, filter: &NoteFilter) -> RepoResult<u64> {
        let predicate = filter.predicate();
        let sql = format!("SELECT COUNT(*) FROM notes{};", predicate.where_sql());
        let total: i64 = self.conn.query_row(
            &sql,
            params_from_iter(predicate.into_binds()),
            |row| row.get(0),
        )?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative note count `{total}`")))
    }

    fn list(&self, filter: &NoteFilter, offset: u64, limit: u64) -> RepoResult<Vec<Note>> {
        let predicate = filter.predicate();
        let sql = format!(
            "{NOTE_SELECT_SQL}{} ORDER BY id ASC LIMIT ? OFFSET ?;",
            predicate.where_sql()
        );
        let mut binds = predicate.into_binds();
        binds.push(Value::Integer(to_sql_integer(limit, "limit")?));
        binds.push(Value::Integer(to_sql_integer(offset, "offset")?));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn insert(&self, note: &NewNote) -> RepoResult<Note> {
        let created_at = to_epoch_micros(note.created_at);
        self.conn
            .execute(
                "INSERT INTO notes (
                    owner_id,
                    title,
                    content,
                    created_at,
                    updated_at,
                    created_by,
                    updated_by
                ) VALUES (?1, ?2, ?3, ?4, ?4, ?1, ?1);",
                params![
                    note.owner_id,
                    note.title.as_str(),
                    note.content.as_str(),
                    created_at
                ],
            )
            .map_err(|err| map_write_error(err, note.owner_id, &note.title))?;

        Ok(Note {
            id: self.conn.last_insert_rowid(),
            owner_id: note.owner_id,
            title: note.title.clone(),
            content: note.content.clone(),
            created_at: note.created_at,
            updated_at: note.created_at,
            deleted_at: None,
            created_by: note.owner_id,
            updated_by: note.owner_id,
            deleted_by: None,
        })
    }

    fn persist(&self, note: &Note) -> RepoResult<()> {
        let predicate = NoteFilter::active_for(note.owner_id)
            .predicate()
            .and_bind("id = ?", Value::Integer(note.id));
        let sql = format!(
            "UPDATE notes
             SET
                title = ?,
                content = ?,
                updated_at = ?,
                updated_by = ?,
                deleted_at = ?,
                deleted_by = ?{};",
            predicate.where_sql()
        );
        let mut binds = vec![
            Value::Text(note.title.clone()),
            Value::Text(note.content.clone()),
            Value::Integer(to_epoch_micros(note.updated_at)),
            Value::Integer(note.updated_by),
            note.deleted_at
                .map_or(Value::Null, |at| Value::Integer(to_epoch_micros(at))),
            note.deleted_by.map_or(Value::Null, Value::Integer),
        ];
        binds.extend(predicate.into_binds());

        let changed = self
            .conn
            .execute(&sql, params_from_iter(binds))
            .map_err(|err| map_write_error(err, note.owner_id, &note.title))?;

        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }
        Ok(())
    }

    fn in_transaction<T, E, F>(&self, mode: TxMode, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        // Dropping an uncommitted `Transaction` rolls it back.
        let tx = Transaction::new_unchecked(self.conn, mode.behavior()).map_err(RepoError::from)?;
        let value = f(self)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}

fn query_one(conn: &Connection, sql: &str, binds: Vec<Value>) -> RepoResult<Option<Note>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(binds))?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_note_row(row)?)),
        None => Ok(None),
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let note = Note {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: parse_timestamp(row.get("created_at")?, "created_at")?,
        updated_at: parse_timestamp(row.get("updated_at")?, "updated_at")?,
        deleted_at: row
            .get::<_, Option<i64>>("deleted_at")?
            .map(|ms| parse_timestamp(ms, "deleted_at"))
            .transpose()?,
        created_by: row.get("created_by")?,
        updated_by: row.get("updated_by")?,
        deleted_by: row.get("deleted_by")?,
    };

    if note.updated_at < note.created_at {
        return Err(RepoError::InvalidData(format!(
            "note {} has updated_at earlier than created_at",
            note.id
        )));
    }
    Ok(note)
}

fn parse_timestamp(epoch_us: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(epoch_us).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{epoch_us}` in notes.{column}"))
    })
}

fn to_epoch_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

fn to_sql_integer(value: u64, what: &str) -> RepoResult<i64> {
    i64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("{what} `{value}` exceeds SQLite integer range")))
}

fn map_write_error(err: rusqlite::Error, owner_id: UserId, title: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::DuplicateTitle {
            owner_id,
            title: title.to_string(),
        }
    } else {
        err.into()
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for &column in NOTE_REQUIRED_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
