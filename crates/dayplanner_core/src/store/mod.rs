//! Day-record store.
//!
//! # Responsibility
//! - Own the date-keyed map of day-records plus selection state.
//! - Expose every mutation as one atomic, synchronous transition.
//! - Persist the full state through the injected repository on each commit
//!   and notify listeners afterwards.
//!
//! # Invariants
//! - A commit builds the next state, persists it, and only then replaces the
//!   current state; a failed persist leaves state, revision and listeners
//!   untouched.
//! - Date keys are created lazily and never removed.
//! - Task-scoped operations on a missing day or task are silent no-ops: no
//!   persist, no revision bump, no notification.
//! - Day-scalar operations (water, mood, notes) materialize a default record.
//! - `get_or_migrate` is a side-effecting read: it may create or upgrade the
//!   record and persist it.

mod normalize;
mod observer;
mod snapshot;

pub use normalize::{migrate_day, needs_migration, normalize_day};
pub use observer::{ChangeKind, Listener, ListenerId, StoreChange};
pub use snapshot::{
    decode_snapshot, encode_snapshot, DecodedSnapshot, PlannerState, StoredDay, StoredTask,
};

use crate::model::date_key::DateKey;
use crate::model::day::{default_day, DayData, Task};
use crate::model::id::TaskId;
use crate::model::mood::Mood;
use crate::repo::snapshot_repo::{RepoError, SnapshotRepository};
use log::{error, info, warn};
use observer::ObserverRegistry;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted blob name used when callers do not configure one.
pub const DEFAULT_STORAGE_KEY: &str = "calendar-storage";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store failure. Domain outcomes are never errors; only the persistence
/// round-trip can fail.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    Encode(serde_json::Error),
    Decode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode store snapshot: {err}"),
            Self::Decode(err) => write!(f, "failed to decode store snapshot: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) | Self::Decode(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Explicit state container for the planner.
///
/// Owned by the composition root and passed by reference to consumers.
pub struct PlannerStore<R: SnapshotRepository> {
    repo: R,
    storage_key: String,
    state: PlannerState,
    revision: u64,
    observers: ObserverRegistry,
}

impl<R: SnapshotRepository> PlannerStore<R> {
    /// Loads the store from the blob named `storage_key`.
    ///
    /// A missing blob yields an empty store; nothing is written until the
    /// first commit.
    pub fn open(repo: R, storage_key: impl Into<String>) -> StoreResult<Self> {
        let storage_key = storage_key.into();
        let state = match repo.load_snapshot(&storage_key)? {
            Some(payload) => {
                let decoded = decode_snapshot(&payload).map_err(StoreError::Decode)?;
                for key in &decoded.skipped_keys {
                    warn!(
                        "event=snapshot_skip_key module=store status=degraded key_len={}",
                        key.len()
                    );
                }
                info!(
                    "event=store_load module=store status=ok source=snapshot days={} skipped_keys={}",
                    decoded.state.day_count(),
                    decoded.skipped_keys.len()
                );
                decoded.state
            }
            None => {
                info!("event=store_load module=store status=ok source=empty days=0");
                PlannerState::default()
            }
        };

        Ok(Self {
            repo,
            storage_key,
            state,
            revision: 0,
            observers: ObserverRegistry::default(),
        })
    }

    /// Opens with the default blob name.
    pub fn open_default(repo: R) -> StoreResult<Self> {
        Self::open(repo, DEFAULT_STORAGE_KEY)
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Current state. Compare `revision()` values to detect changes cheaply.
    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    /// Monotonic counter bumped by every committed change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selected_date(&self) -> Option<DateKey> {
        self.state.selected_date
    }

    pub fn is_modal_open(&self) -> bool {
        self.state.is_modal_open
    }

    pub fn contains_day(&self, date: DateKey) -> bool {
        self.state.days.contains_key(&date)
    }

    /// Stored date keys in calendar order.
    pub fn days(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.state.dates()
    }

    /// Normalized view without side effects.
    ///
    /// Absent dates yield the default record, which is not stored.
    pub fn peek(&self, date: DateKey) -> DayData {
        match self.state.days.get(&date) {
            Some(stored) => normalize_day(date, stored),
            None => default_day(date),
        }
    }

    /// Returns the normalized record, writing when needed.
    ///
    /// - Absent date: stores and persists the default record.
    /// - Stale record (see `needs_migration`): stores and persists the
    ///   upgraded record.
    /// - Otherwise: pure read.
    pub fn get_or_migrate(&mut self, date: DateKey) -> StoreResult<DayData> {
        let Some(stored) = self.state.days.get(&date) else {
            let day = default_day(date);
            self.commit_day(&day, ChangeKind::DayMaterialized)?;
            return Ok(day);
        };

        let day = normalize_day(date, stored);
        if needs_migration(stored) {
            self.commit_day(&day, ChangeKind::DayMigrated)?;
            info!(
                "event=day_migrated module=store status=ok date={} tasks={}",
                date,
                day.tasks.len()
            );
        }
        Ok(day)
    }

    /// Appends a new task and returns its id.
    ///
    /// Text is stored verbatim; blank guards belong to the caller.
    pub fn add_task(&mut self, date: DateKey, text: impl Into<String>) -> StoreResult<TaskId> {
        let task = Task::new(text);
        let id = task.id.clone();
        self.update_day(date, ChangeKind::TaskAdded, |day| day.tasks.push(task))?;
        Ok(id)
    }

    pub fn toggle_task(&mut self, date: DateKey, task_id: &str) -> StoreResult<()> {
        self.update_task(date, task_id, ChangeKind::TaskToggled, |task| {
            task.completed = !task.completed;
        })
    }

    /// Removes the task with `task_id`; siblings keep their order.
    pub fn delete_task(&mut self, date: DateKey, task_id: &str) -> StoreResult<()> {
        self.update_existing_day(date, ChangeKind::TaskDeleted, |day| {
            let before = day.tasks.len();
            day.tasks.retain(|task| task.id != task_id);
            day.tasks.len() != before
        })
    }

    pub fn toggle_task_calendar_visibility(
        &mut self,
        date: DateKey,
        task_id: &str,
    ) -> StoreResult<()> {
        self.update_task(date, task_id, ChangeKind::TaskVisibilityToggled, |task| {
            task.show_in_calendar = !task.show_in_calendar;
        })
    }

    pub fn set_task_icon(
        &mut self,
        date: DateKey,
        task_id: &str,
        icon: impl Into<String>,
    ) -> StoreResult<()> {
        let icon = icon.into();
        self.update_task(date, task_id, ChangeKind::TaskIconSet, |task| {
            task.icon = icon;
        })
    }

    /// Overwrites task text verbatim, including empty text.
    pub fn update_task_text(
        &mut self,
        date: DateKey,
        task_id: &str,
        text: impl Into<String>,
    ) -> StoreResult<()> {
        let text = text.into();
        self.update_task(date, task_id, ChangeKind::TaskTextUpdated, |task| {
            task.text = text;
        })
    }

    /// Sets the water count, clamping negative input to zero.
    pub fn set_water_count(&mut self, date: DateKey, count: i64) -> StoreResult<()> {
        let clamped = u32::try_from(count.max(0)).unwrap_or(u32::MAX);
        self.update_day(date, ChangeKind::WaterSet, |day| day.water_count = clamped)
    }

    pub fn increment_water(&mut self, date: DateKey) -> StoreResult<()> {
        self.update_day(date, ChangeKind::WaterIncremented, |day| {
            day.water_count = day.water_count.saturating_add(1);
        })
    }

    /// Decrements the water count, holding at zero.
    pub fn decrement_water(&mut self, date: DateKey) -> StoreResult<()> {
        self.update_day(date, ChangeKind::WaterDecremented, |day| {
            day.water_count = day.water_count.saturating_sub(1);
        })
    }

    /// Overwrites the mood; `None` clears it. Never toggles.
    pub fn set_mood(&mut self, date: DateKey, mood: Option<Mood>) -> StoreResult<()> {
        self.update_day(date, ChangeKind::MoodSet, |day| day.mood = mood)
    }

    pub fn set_notes(&mut self, date: DateKey, notes: impl Into<String>) -> StoreResult<()> {
        let notes = notes.into();
        self.update_day(date, ChangeKind::NotesSet, |day| day.notes = notes)
    }

    pub fn set_selected_date(&mut self, date: Option<DateKey>) -> StoreResult<()> {
        let mut next = self.state.clone();
        next.selected_date = date;
        self.commit(next, ChangeKind::SelectedDateSet, None)
    }

    pub fn set_modal_open(&mut self, open: bool) -> StoreResult<()> {
        let mut next = self.state.clone();
        next.is_modal_open = open;
        self.commit(next, ChangeKind::ModalOpenSet, None)
    }

    /// Registers a listener called after every committed change.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange<'_>) + 'static) -> ListenerId {
        self.observers.subscribe(Box::new(listener))
    }

    /// Removes a listener; returns `false` when it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.observers.len()
    }

    /// Day-scalar path: materializes the default record when absent.
    fn update_day(
        &mut self,
        date: DateKey,
        kind: ChangeKind,
        apply: impl FnOnce(&mut DayData),
    ) -> StoreResult<()> {
        let mut day = self.peek(date);
        apply(&mut day);
        self.commit_day(&day, kind)
    }

    /// Task path: no-op when the day is absent or `apply` reports no change.
    fn update_existing_day(
        &mut self,
        date: DateKey,
        kind: ChangeKind,
        apply: impl FnOnce(&mut DayData) -> bool,
    ) -> StoreResult<()> {
        let Some(stored) = self.state.days.get(&date) else {
            return Ok(());
        };
        let mut day = normalize_day(date, stored);
        if !apply(&mut day) {
            return Ok(());
        }
        self.commit_day(&day, kind)
    }

    fn update_task(
        &mut self,
        date: DateKey,
        task_id: &str,
        kind: ChangeKind,
        apply: impl FnOnce(&mut Task),
    ) -> StoreResult<()> {
        self.update_existing_day(date, kind, |day| match day.task_mut(task_id) {
            Some(task) => {
                apply(task);
                true
            }
            None => false,
        })
    }

    fn commit_day(&mut self, day: &DayData, kind: ChangeKind) -> StoreResult<()> {
        let mut next = self.state.clone();
        next.days.insert(day.date, StoredDay::from(day));
        self.commit(next, kind, Some(day.date))
    }

    fn commit(
        &mut self,
        next: PlannerState,
        kind: ChangeKind,
        date: Option<DateKey>,
    ) -> StoreResult<()> {
        let payload = encode_snapshot(&next).map_err(StoreError::Encode)?;
        if let Err(err) = self.repo.save_snapshot(&self.storage_key, &payload) {
            error!(
                "event=store_persist module=store status=error op={} error={}",
                kind.as_str(),
                err
            );
            return Err(err.into());
        }

        self.state = next;
        self.revision += 1;
        let change = StoreChange {
            revision: self.revision,
            kind,
            date,
            state: &self.state,
        };
        self.observers.notify(&change);
        Ok(())
    }
}
