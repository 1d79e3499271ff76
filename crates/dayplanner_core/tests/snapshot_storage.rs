use dayplanner_core::db::{open_db, open_db_in_memory};
use dayplanner_core::{
    DateKey, Mood, PlannerStore, SnapshotRepository, SqliteSnapshotRepository, StoreError,
    DEFAULT_STORAGE_KEY,
};

fn date(raw: &str) -> DateKey {
    DateKey::parse(raw).unwrap()
}

#[test]
fn sqlite_repository_upserts_named_snapshots() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::new(&conn);

    assert_eq!(repo.load_snapshot("calendar-storage").unwrap(), None);
    repo.save_snapshot("calendar-storage", "{\"a\":1}").unwrap();
    repo.save_snapshot("calendar-storage", "{\"a\":2}").unwrap();
    repo.save_snapshot("other", "{}").unwrap();

    assert_eq!(
        repo.load_snapshot("calendar-storage").unwrap().as_deref(),
        Some("{\"a\":2}")
    );
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM snapshots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 2);
}

#[test]
fn store_state_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.db");
    let day = date("2025-03-10");

    let task_id = {
        let conn = open_db(&path).unwrap();
        let mut store = PlannerStore::open_default(SqliteSnapshotRepository::new(&conn)).unwrap();
        let id = store.add_task(day, "Buy milk").unwrap();
        store.toggle_task(day, &id).unwrap();
        store.set_water_count(day, 5).unwrap();
        store.set_mood(day, Some(Mood::Great)).unwrap();
        store.set_notes(day, "quiet day").unwrap();
        id
    };

    let conn = open_db(&path).unwrap();
    let store = PlannerStore::open_default(SqliteSnapshotRepository::new(&conn)).unwrap();
    let data = store.peek(day);
    assert_eq!(data.tasks.len(), 1);
    assert_eq!(data.tasks[0].id, task_id);
    assert!(data.tasks[0].completed);
    assert_eq!(data.water_count, 5);
    assert_eq!(data.mood, Some(Mood::Great));
    assert_eq!(data.notes, "quiet day");
}

#[test]
fn storage_keys_isolate_planners() {
    let conn = open_db_in_memory().unwrap();
    let day = date("2025-03-10");

    let mut work = PlannerStore::open(SqliteSnapshotRepository::new(&conn), "work").unwrap();
    work.increment_water(day).unwrap();

    let default = PlannerStore::open_default(SqliteSnapshotRepository::new(&conn)).unwrap();
    assert_eq!(default.storage_key(), DEFAULT_STORAGE_KEY);
    assert!(!default.contains_day(day));
}

#[test]
fn corrupt_blob_fails_to_open() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::new(&conn);
    repo.save_snapshot(DEFAULT_STORAGE_KEY, "not json").unwrap();

    let err = PlannerStore::open_default(repo).err().unwrap();
    assert!(matches!(err, StoreError::Decode(_)));
}
