use dayplanner_core::service::calendar::{close_day, open_day, CALENDAR_GRID_CELLS};
use dayplanner_core::service::checklist::submit_new_task;
use dayplanner_core::{
    month_view, DateKey, DaySummary, DraftStatus, MemorySnapshotRepository, Mood, MonthCursor,
    NotesDraft, PlannerStore,
};
use std::time::{Duration, Instant};

fn date(raw: &str) -> DateKey {
    DateKey::parse(raw).unwrap()
}

#[test]
fn month_view_reads_without_materializing_days() {
    let repo = MemorySnapshotRepository::new();
    let mut store = PlannerStore::open_default(&repo).unwrap();
    let busy = date("2025-03-10");
    store.add_task(busy, "one").unwrap();
    store.add_task(busy, "two").unwrap();
    store.add_task(busy, "three").unwrap();
    store.set_mood(busy, Some(Mood::Great)).unwrap();
    let saves_before = repo.save_count();

    let cursor = MonthCursor::new(2025, 3).unwrap();
    let cells = month_view(&store, cursor, date("2025-03-15"));

    assert_eq!(cells.len(), CALENDAR_GRID_CELLS);
    assert_eq!(repo.save_count(), saves_before);
    assert_eq!(store.days().count(), 1);

    let busy_cell = cells.iter().find(|cell| cell.date == busy).unwrap();
    let indicators = busy_cell.indicators.as_ref().unwrap();
    assert_eq!(indicators.tasks.len(), 2);
    assert_eq!(indicators.hidden_task_count, 1);
    assert_eq!(indicators.mood, Some(Mood::Great));

    let today_cell = cells.iter().find(|cell| cell.is_today).unwrap();
    assert_eq!(today_cell.date, date("2025-03-15"));
    assert!(today_cell.indicators.is_none());
    assert_eq!(cells.iter().filter(|cell| cell.in_month).count(), 31);
}

#[test]
fn hidden_tasks_do_not_appear_in_cells() {
    let repo = MemorySnapshotRepository::new();
    let mut store = PlannerStore::open_default(&repo).unwrap();
    let day = date("2025-03-10");
    let id = store.add_task(day, "private").unwrap();
    store.toggle_task_calendar_visibility(day, &id).unwrap();

    let cells = month_view(&store, MonthCursor::of(day), day);
    let cell = cells.iter().find(|cell| cell.date == day).unwrap();
    assert!(cell.indicators.is_none());
}

#[test]
fn open_and_close_day_drive_selection_state() {
    let repo = MemorySnapshotRepository::new();
    let mut store = PlannerStore::open_default(&repo).unwrap();
    let cursor = MonthCursor::new(2025, 3).unwrap();

    assert!(!open_day(&mut store, cursor, date("2025-04-01")).unwrap());
    assert_eq!(store.selected_date(), None);

    assert!(open_day(&mut store, cursor, date("2025-03-10")).unwrap());
    assert_eq!(store.selected_date(), Some(date("2025-03-10")));
    assert!(store.is_modal_open());

    close_day(&mut store).unwrap();
    assert!(!store.is_modal_open());
    assert_eq!(store.selected_date(), Some(date("2025-03-10")));
}

#[test]
fn notes_draft_commits_through_the_store_after_quiet_period() {
    let repo = MemorySnapshotRepository::new();
    let mut store = PlannerStore::open_default(&repo).unwrap();
    let day = date("2025-03-10");
    let quiet = Duration::from_millis(1000);
    let start = Instant::now();

    let mut draft = NotesDraft::for_day(&store, day, quiet);
    draft.edit("Slept well", start);
    assert!(!draft.commit_due(&mut store, start + Duration::from_millis(500)).unwrap());
    assert!(!store.contains_day(day));

    assert!(draft.commit_due(&mut store, start + quiet).unwrap());
    assert_eq!(store.peek(day).notes, "Slept well");
    assert_eq!(draft.status(), DraftStatus::Saved);
}

#[test]
fn summary_reflects_store_changes() {
    let repo = MemorySnapshotRepository::new();
    let mut store = PlannerStore::open_default(&repo).unwrap();
    let day = date("2025-03-10");

    let id = submit_new_task(&mut store, day, "  stretch  ").unwrap().unwrap();
    submit_new_task(&mut store, day, "read").unwrap();
    assert_eq!(submit_new_task(&mut store, day, "   ").unwrap(), None);
    store.toggle_task(day, &id).unwrap();
    store.set_water_count(day, 9).unwrap();

    let summary = DaySummary::of(&store.peek(day));
    assert_eq!(summary.tasks.completed, 1);
    assert_eq!(summary.tasks.total, 2);
    assert_eq!(summary.tasks.percent(), 50);
    assert!(summary.water.reached());
    assert_eq!(summary.water.extra_glasses(), 1);
    assert_eq!(store.peek(day).task(&id).unwrap().text, "stretch");
}
