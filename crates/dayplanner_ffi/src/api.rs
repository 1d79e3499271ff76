//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level planner functions to Dart via FRB.
//! - Keep error semantics simple: every failure becomes an envelope.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each planner call opens the configured database, loads the store,
//!   applies one operation and returns the resulting view.
//! - Planner calls are serialized process-wide so two callers never
//!   interleave a load and a save of the same blob.

use dayplanner_core::db::open_db;
use dayplanner_core::service::checklist::{commit_task_edit, submit_new_task};
use dayplanner_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, month_view,
    ping as ping_inner, CalendarCell, DateKey, DayData, Mood, MonthCursor, PlannerConfig,
    PlannerStore, SqliteSnapshotRepository, Task,
};
use log::warn;
use std::sync::{Mutex, OnceLock};

static PLANNER_CONFIG: OnceLock<Result<PlannerConfig, String>> = OnceLock::new();
static PLANNER_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task row as shown by the day detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerTaskItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub show_in_calendar: bool,
    pub icon: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Fully normalized day-record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerDayItem {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub tasks: Vec<PlannerTaskItem>,
    pub water_count: u32,
    /// Lowercase mood name (`angry|tired|sad|great|fun`).
    pub mood: Option<String>,
    pub notes: String,
}

/// Response envelope shared by day reads and day mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerDayResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Created task id (`planner_add_task` only).
    pub task_id: Option<String>,
    /// Day after the operation; `None` on failure.
    pub day: Option<PlannerDayItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl PlannerDayResponse {
    fn success(message: impl Into<String>, day: &DayData, task_id: Option<String>) -> Self {
        Self {
            ok: true,
            task_id,
            day: Some(to_day_item(day)),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            day: None,
            message: message.into(),
        }
    }
}

/// Task line inside a calendar cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerCellTask {
    pub id: String,
    pub icon: String,
    pub text: String,
    pub completed: bool,
}

/// One of the 42 calendar grid cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerMonthCell {
    pub date: String,
    pub in_month: bool,
    pub is_today: bool,
    pub tasks: Vec<PlannerCellTask>,
    pub hidden_task_count: u32,
    pub water_count: Option<u32>,
    pub mood: Option<String>,
    pub has_notes: bool,
}

/// Month grid response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerMonthResponse {
    pub ok: bool,
    pub year: i32,
    pub month: u32,
    /// Empty on failure, otherwise exactly 42 cells.
    pub cells: Vec<PlannerMonthCell>,
    pub message: String,
}

/// Reads one day, creating or upgrading its stored record when needed.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_get_day(date: String) -> PlannerDayResponse {
    day_call("planner_get_day", &date, |store, key| {
        let day = store.get_or_migrate(key).map_err(|err| err.to_string())?;
        Ok(("Day loaded.", day, None))
    })
}

/// Adds a task from raw editor input; blank input is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_add_task(date: String, text: String) -> PlannerDayResponse {
    day_call("planner_add_task", &date, |store, key| {
        match submit_new_task(store, key, &text).map_err(|err| err.to_string())? {
            Some(task_id) => Ok(("Task added.", store.peek(key), Some(task_id))),
            None => Err("task text must not be blank".to_string()),
        }
    })
}

/// Flips completion. Unknown ids leave the day unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_toggle_task(date: String, task_id: String) -> PlannerDayResponse {
    day_call("planner_toggle_task", &date, |store, key| {
        store
            .toggle_task(key, &task_id)
            .map_err(|err| err.to_string())?;
        Ok(("Task toggled.", store.peek(key), None))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_task(date: String, task_id: String) -> PlannerDayResponse {
    day_call("planner_delete_task", &date, |store, key| {
        store
            .delete_task(key, &task_id)
            .map_err(|err| err.to_string())?;
        Ok(("Task deleted.", store.peek(key), None))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn planner_toggle_visibility(date: String, task_id: String) -> PlannerDayResponse {
    day_call("planner_toggle_visibility", &date, |store, key| {
        store
            .toggle_task_calendar_visibility(key, &task_id)
            .map_err(|err| err.to_string())?;
        Ok(("Task visibility toggled.", store.peek(key), None))
    })
}

/// Sets the task icon. Any glyph is accepted.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_set_task_icon(date: String, task_id: String, icon: String) -> PlannerDayResponse {
    day_call("planner_set_task_icon", &date, |store, key| {
        store
            .set_task_icon(key, &task_id, icon)
            .map_err(|err| err.to_string())?;
        Ok(("Task icon set.", store.peek(key), None))
    })
}

/// Commits an inline edit; blank edits keep the previous text.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_update_task_text(date: String, task_id: String, text: String) -> PlannerDayResponse {
    day_call("planner_update_task_text", &date, |store, key| {
        let message = if commit_task_edit(store, key, &task_id, &text)
            .map_err(|err| err.to_string())?
        {
            "Task text updated."
        } else {
            "Blank edit discarded."
        };
        Ok((message, store.peek(key), None))
    })
}

/// Sets the water count; negative input is stored as zero.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_set_water(date: String, count: i64) -> PlannerDayResponse {
    day_call("planner_set_water", &date, |store, key| {
        store
            .set_water_count(key, count)
            .map_err(|err| err.to_string())?;
        Ok(("Water count set.", store.peek(key), None))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn planner_increment_water(date: String) -> PlannerDayResponse {
    day_call("planner_increment_water", &date, |store, key| {
        store.increment_water(key).map_err(|err| err.to_string())?;
        Ok(("Water count incremented.", store.peek(key), None))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn planner_decrement_water(date: String) -> PlannerDayResponse {
    day_call("planner_decrement_water", &date, |store, key| {
        store.decrement_water(key).map_err(|err| err.to_string())?;
        Ok(("Water count decremented.", store.peek(key), None))
    })
}

/// Sets or clears the mood.
///
/// Input semantics:
/// - `None` or blank clears the mood.
/// - Unknown names are rejected without touching the day.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_set_mood(date: String, mood: Option<String>) -> PlannerDayResponse {
    let mood = match parse_mood(mood.as_deref()) {
        Ok(mood) => mood,
        Err(err) => return PlannerDayResponse::failure(format!("planner_set_mood failed: {err}")),
    };
    day_call("planner_set_mood", &date, |store, key| {
        store.set_mood(key, mood).map_err(|err| err.to_string())?;
        Ok(("Mood set.", store.peek(key), None))
    })
}

/// Stores notes verbatim. Callers debounce keystrokes before calling.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_set_notes(date: String, notes: String) -> PlannerDayResponse {
    day_call("planner_set_notes", &date, |store, key| {
        store.set_notes(key, notes).map_err(|err| err.to_string())?;
        Ok(("Notes saved.", store.peek(key), None))
    })
}

/// Builds the 42-cell grid for `year`/`month`.
///
/// # FFI contract
/// - Read-only: never creates day-records.
/// - `today` is the caller's local date; it only drives `is_today`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_month_view(year: i32, month: u32, today: String) -> PlannerMonthResponse {
    let failure = |message: String| PlannerMonthResponse {
        ok: false,
        year,
        month,
        cells: Vec::new(),
        message,
    };

    let Some(cursor) = MonthCursor::new(year, month) else {
        return failure(format!("planner_month_view failed: invalid month {year}-{month}"));
    };
    let today = match DateKey::parse(today.trim()) {
        Ok(today) => today,
        Err(err) => return failure(format!("planner_month_view failed: {err}")),
    };

    match with_store(|store| Ok(month_view(store, cursor, today))) {
        Ok(cells) => PlannerMonthResponse {
            ok: true,
            year,
            month,
            cells: cells.into_iter().map(to_month_cell).collect(),
            message: format!("{} {year}", cursor.month_name()),
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op=planner_month_view");
            failure(format!("planner_month_view failed: {err}"))
        }
    }
}

fn day_call(
    op: &'static str,
    date: &str,
    f: impl FnOnce(
        &mut PlannerStore<SqliteSnapshotRepository<'_>>,
        DateKey,
    ) -> Result<(&'static str, DayData, Option<String>), String>,
) -> PlannerDayResponse {
    let key = match DateKey::parse(date.trim()) {
        Ok(key) => key,
        Err(err) => return PlannerDayResponse::failure(format!("{op} failed: {err}")),
    };

    match with_store(|store| f(store, key)) {
        Ok((message, day, task_id)) => PlannerDayResponse::success(message, &day, task_id),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op={op} date={key}");
            PlannerDayResponse::failure(format!("{op} failed: {err}"))
        }
    }
}

fn with_store<T>(
    f: impl FnOnce(&mut PlannerStore<SqliteSnapshotRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let config = planner_config()?;
    let _guard = PLANNER_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let conn = open_db(&config.db_path).map_err(|err| format!("planner DB open failed: {err}"))?;
    let mut store = PlannerStore::open(
        SqliteSnapshotRepository::new(&conn),
        config.storage_key.as_str(),
    )
    .map_err(|err| format!("planner store load failed: {err}"))?;
    f(&mut store)
}

fn planner_config() -> Result<&'static PlannerConfig, String> {
    PLANNER_CONFIG
        .get_or_init(|| PlannerConfig::from_env().map_err(|err| err.to_string()))
        .as_ref()
        .map_err(Clone::clone)
}

fn parse_mood(raw: Option<&str>) -> Result<Option<Mood>, String> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => Mood::parse(value)
            .map(Some)
            .ok_or_else(|| format!("unknown mood `{value}`")),
    }
}

fn to_day_item(day: &DayData) -> PlannerDayItem {
    PlannerDayItem {
        date: day.date.to_string(),
        tasks: day.tasks.iter().map(to_task_item).collect(),
        water_count: day.water_count,
        mood: day.mood.map(|mood| mood.as_str().to_string()),
        notes: day.notes.clone(),
    }
}

fn to_task_item(task: &Task) -> PlannerTaskItem {
    PlannerTaskItem {
        id: task.id.clone(),
        text: task.text.clone(),
        completed: task.completed,
        show_in_calendar: task.show_in_calendar,
        icon: task.icon.clone(),
        created_at: task.created_at.to_rfc3339(),
    }
}

fn to_month_cell(cell: CalendarCell) -> PlannerMonthCell {
    let indicators = cell.indicators.unwrap_or_default();
    PlannerMonthCell {
        date: cell.date.to_string(),
        in_month: cell.in_month,
        is_today: cell.is_today,
        tasks: indicators
            .tasks
            .into_iter()
            .map(|task| PlannerCellTask {
                id: task.id,
                icon: task.icon,
                text: task.text,
                completed: task.completed,
            })
            .collect(),
        hidden_task_count: u32::try_from(indicators.hidden_task_count).unwrap_or(u32::MAX),
        water_count: indicators.water_count,
        mood: indicators.mood.map(|mood| mood.as_str().to_string()),
        has_notes: indicators.has_notes,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, parse_mood, ping, planner_add_task, planner_config,
        planner_decrement_water, planner_delete_task, planner_get_day, planner_increment_water,
        planner_month_view, planner_set_mood, planner_set_notes, planner_set_task_icon,
        planner_set_water, planner_toggle_task, planner_toggle_visibility,
        planner_update_task_text, PLANNER_CONFIG,
    };
    use dayplanner_core::{Mood, PlannerConfig};
    use std::path::PathBuf;
    use std::sync::OnceLock;

    // Tests share one database file, so each test owns a distinct date.
    static TEST_DB_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();

    /// Points the cached config at a per-process temp database.
    ///
    /// Must run before the first planner call of every test.
    fn use_temp_database() -> PathBuf {
        let dir = TEST_DB_DIR.get_or_init(|| tempfile::tempdir().unwrap());
        let db_path = dir.path().join("planner.sqlite3");
        let _ = PLANNER_CONFIG.set(Ok(PlannerConfig {
            db_path: db_path.clone(),
            ..PlannerConfig::default()
        }));
        db_path
    }

    #[test]
    fn planner_calls_use_the_temp_database() {
        let db_path = use_temp_database();
        assert_eq!(planner_config().unwrap().db_path, db_path);

        assert!(planner_set_water("2091-01-09".to_string(), 2).ok);
        assert!(db_path.exists());
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn planner_rejects_malformed_dates() {
        use_temp_database();
        let response = planner_get_day("03/10/2025".to_string());
        assert!(!response.ok);
        assert!(response.day.is_none());
        assert!(response.message.starts_with("planner_get_day failed"));
    }

    #[test]
    fn add_then_edit_task_round_trips_through_database() {
        use_temp_database();
        let date = "2091-01-05".to_string();
        let added = planner_add_task(date.clone(), "  Buy milk ".to_string());
        assert!(added.ok, "{}", added.message);
        let task_id = added.task_id.clone().unwrap();

        let day = planner_get_day(date.clone()).day.unwrap();
        let task = day.tasks.iter().find(|task| task.id == task_id).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(task.show_in_calendar);
        assert_eq!(task.icon, "📝");

        let edited = planner_update_task_text(date.clone(), task_id.clone(), "   ".to_string());
        assert!(edited.ok);
        assert_eq!(edited.message, "Blank edit discarded.");

        planner_toggle_task(date.clone(), task_id.clone());
        planner_toggle_visibility(date.clone(), task_id.clone());
        let updated = planner_set_task_icon(date.clone(), task_id.clone(), "🛒".to_string());
        let task = updated
            .day
            .unwrap()
            .tasks
            .into_iter()
            .find(|task| task.id == task_id)
            .unwrap();
        assert!(task.completed);
        assert!(!task.show_in_calendar);
        assert_eq!(task.icon, "🛒");

        let deleted = planner_delete_task(date, task_id.clone());
        assert!(deleted.ok);
        assert!(deleted
            .day
            .unwrap()
            .tasks
            .iter()
            .all(|task| task.id != task_id));
    }

    #[test]
    fn blank_task_is_rejected() {
        use_temp_database();
        let response = planner_add_task("2091-01-06".to_string(), " \t".to_string());
        assert!(!response.ok);
        assert!(response.task_id.is_none());
    }

    #[test]
    fn water_operations_clamp_at_zero() {
        use_temp_database();
        let date = "2091-01-07".to_string();
        assert_eq!(
            planner_set_water(date.clone(), -4).day.unwrap().water_count,
            0
        );
        assert_eq!(
            planner_decrement_water(date.clone()).day.unwrap().water_count,
            0
        );
        planner_set_water(date.clone(), 3);
        assert_eq!(planner_increment_water(date).day.unwrap().water_count, 4);
    }

    #[test]
    fn mood_and_notes_are_stored() {
        use_temp_database();
        let date = "2091-01-08".to_string();
        let response = planner_set_mood(date.clone(), Some("great".to_string()));
        assert_eq!(response.day.unwrap().mood.as_deref(), Some("great"));

        let rejected = planner_set_mood(date.clone(), Some("ecstatic".to_string()));
        assert!(!rejected.ok);

        let cleared = planner_set_mood(date.clone(), None);
        assert_eq!(cleared.day.unwrap().mood, None);

        let notes = planner_set_notes(date, "line one\nline two".to_string());
        assert_eq!(notes.day.unwrap().notes, "line one\nline two");
    }

    #[test]
    fn month_view_returns_full_grid() {
        use_temp_database();
        planner_set_mood("2091-02-14".to_string(), Some("fun".to_string()));

        let response = planner_month_view(2091, 2, "2091-02-01".to_string());
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.cells.len(), 42);
        let cell = response
            .cells
            .iter()
            .find(|cell| cell.date == "2091-02-14")
            .unwrap();
        assert_eq!(cell.mood.as_deref(), Some("fun"));
        assert!(response.cells.iter().any(|cell| cell.is_today));

        assert!(!planner_month_view(2091, 13, "2091-02-01".to_string()).ok);
    }

    #[test]
    fn parse_mood_treats_blank_as_clear() {
        assert_eq!(parse_mood(Some("  ")), Ok(None));
        assert_eq!(parse_mood(Some("sad")), Ok(Some(Mood::Sad)));
        assert!(parse_mood(Some("meh")).is_err());
    }
}
