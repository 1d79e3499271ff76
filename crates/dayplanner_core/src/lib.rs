//! Core domain logic for the day planner.
//! This crate is the single source of truth for day-record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, PlannerConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::date_key::{DateKey, DateKeyError};
pub use model::day::{default_day, DayData, Task};
pub use model::icon::{IconCategory, DEFAULT_TASK_ICON};
pub use model::id::{new_task_id, TaskId};
pub use model::mood::{toggle_mood, Mood};
pub use repo::snapshot_repo::{
    MemorySnapshotRepository, RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository,
};
pub use service::calendar::{month_view, CalendarCell, CellIndicators, MonthCursor};
pub use service::day_summary::DaySummary;
pub use service::notes_draft::{DraftStatus, NotesDraft};
pub use store::{
    ChangeKind, ListenerId, PlannerState, PlannerStore, StoreChange, StoreError, StoreResult,
    DEFAULT_STORAGE_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
