mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{draft, ALICE, BOB};
use quillnote_core::db::migrations::latest_version;
use quillnote_core::db::open_db_in_memory;
use quillnote_core::{NewNote, NoteFilter, NoteStore, RepoError, SqliteNoteStore, TxMode};
use rusqlite::Connection;

fn new_note(owner_id: i64, title: &str) -> NewNote {
    NewNote::new(
        owner_id,
        draft(title),
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    )
}

#[test]
fn insert_assigns_ids_and_records_actors() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn).unwrap();

    let first = store.insert(&new_note(ALICE, "first")).unwrap();
    let second = store.insert(&new_note(ALICE, "second")).unwrap();

    assert!(second.id > first.id);
    assert_eq!(first.created_by, ALICE);
    assert_eq!(first.updated_by, ALICE);
    assert_eq!(first.created_at, first.updated_at);
    assert!(first.is_active());

    let loaded = store.find_by_id_owner_active(first.id, ALICE).unwrap().unwrap();
    assert_eq!(loaded, first);
}

#[test]
fn id_lookup_is_scoped_to_owner_and_active_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn).unwrap();
    let mut note = store.insert(&new_note(ALICE, "private")).unwrap();

    assert!(store.find_by_id_owner_active(note.id, BOB).unwrap().is_none());

    note.mark_deleted(ALICE, note.updated_at + Duration::seconds(1));
    store.persist(&note).unwrap();
    assert!(store.find_by_id_owner_active(note.id, ALICE).unwrap().is_none());
}

#[test]
fn title_lookup_honours_active_only_flag() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn).unwrap();
    let mut note = store.insert(&new_note(ALICE, "journal")).unwrap();
    note.mark_deleted(ALICE, note.updated_at);
    store.persist(&note).unwrap();

    assert!(store
        .find_by_owner_and_title(ALICE, "journal", true)
        .unwrap()
        .is_none());
    let any = store
        .find_by_owner_and_title(ALICE, "journal", false)
        .unwrap()
        .unwrap();
    assert_eq!(any.id, note.id);
    assert!(store
        .find_by_owner_and_title(BOB, "journal", false)
        .unwrap()
        .is_none());
}

#[test]
fn unique_index_rejects_second_active_title_per_owner() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn).unwrap();
    store.insert(&new_note(ALICE, "dup")).unwrap();

    let err = store.insert(&new_note(ALICE, "dup")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateTitle { owner_id: ALICE, ref title } if title == "dup"
    ));

    // Other owners are unaffected.
    store.insert(&new_note(BOB, "dup")).unwrap();
}

#[test]
fn unique_index_releases_title_after_soft_delete() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn).unwrap();
    let mut note = store.insert(&new_note(ALICE, "reuse")).unwrap();
    note.mark_deleted(ALICE, note.updated_at);
    store.persist(&note).unwrap();

    store.insert(&new_note(ALICE, "reuse")).unwrap();
}

#[test]
fn persist_refuses_deleted_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn).unwrap();
    let mut note = store.insert(&new_note(ALICE, "terminal")).unwrap();
    note.mark_deleted(ALICE, note.updated_at);
    store.persist(&note).unwrap();

    note.content = "edited after delete".to_string();
    let err = store.persist(&note).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == note.id));
}

#[test]
fn persist_only_touches_the_owners_row() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn).unwrap();
    let mine = store.insert(&new_note(ALICE, "mine")).unwrap();
    let neighbour = store.insert(&new_note(ALICE, "neighbour")).unwrap();

    let mut hijacked = mine.clone();
    hijacked.owner_id = BOB;
    hijacked.content = "rewritten by bob".to_string();
    let err = store.persist(&hijacked).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == mine.id));

    let mut edited = mine.clone();
    edited.content = "rewritten by alice".to_string();
    store.persist(&edited).unwrap();

    assert_eq!(store.find_by_id_owner_active(mine.id, ALICE).unwrap().unwrap(), edited);
    assert_eq!(
        store.find_by_id_owner_active(neighbour.id, ALICE).unwrap().unwrap(),
        neighbour
    );
}

#[test]
fn count_and_list_share_the_filter() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn).unwrap();
    let a1 = store.insert(&new_note(ALICE, "a1")).unwrap();
    let mut a2 = store.insert(&new_note(ALICE, "a2")).unwrap();
    let b1 = store.insert(&new_note(BOB, "b1")).unwrap();
    a2.mark_deleted(ALICE, a2.updated_at);
    store.persist(&a2).unwrap();

    let cases = [
        (NoteFilter::for_listing(ALICE, true, false), vec![a1.id]),
        (NoteFilter::for_listing(ALICE, true, true), vec![a1.id, a2.id]),
        (NoteFilter::for_listing(ALICE, false, false), vec![a1.id, b1.id]),
        (NoteFilter::for_listing(ALICE, false, true), vec![a1.id, a2.id, b1.id]),
    ];
    for (filter, expected) in cases {
        let listed: Vec<_> = store
            .list(&filter, 0, 100)
            .unwrap()
            .into_iter()
            .map(|note| note.id)
            .collect();
        assert_eq!(listed, expected, "{filter:?}");
        assert_eq!(store.count(&filter).unwrap(), expected.len() as u64);
    }
}

#[test]
fn transaction_rolls_back_on_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteNoteStore::try_new(&conn).unwrap();

    let result: Result<(), RepoError> = store.in_transaction(TxMode::Write, |store| {
        store.insert(&new_note(ALICE, "rolled back"))?;
        Err(RepoError::InvalidData("abort".to_string()))
    });
    assert!(result.is_err());
    assert_eq!(store.count(&NoteFilter::active()).unwrap(), 0);

    store
        .in_transaction(TxMode::Write, |store| {
            store.insert(&new_note(ALICE, "committed")).map(|_| ())
        })
        .unwrap();
    assert_eq!(store.count(&NoteFilter::active()).unwrap(), 1);
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteNoteStore::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE notes (
            id INTEGER PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteNoteStore::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "notes",
            column: "created_at"
        })
    ));
}
