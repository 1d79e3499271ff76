//! Checklist input guards.
//!
//! The store accepts any text verbatim. These helpers apply the editor rules
//! on top: input is trimmed and blank submissions are dropped.

use crate::model::date_key::DateKey;
use crate::model::id::TaskId;
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::store::{PlannerStore, StoreResult};

/// Adds a task from raw editor input.
///
/// Returns `Ok(None)` without touching the store when the trimmed input is
/// blank.
pub fn submit_new_task<R: SnapshotRepository>(
    store: &mut PlannerStore<R>,
    date: DateKey,
    raw: &str,
) -> StoreResult<Option<TaskId>> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    store.add_task(date, text).map(Some)
}

/// Commits an inline task edit.
///
/// Blank edits are discarded and the task keeps its previous text. Returns
/// whether the edit reached the store.
pub fn commit_task_edit<R: SnapshotRepository>(
    store: &mut PlannerStore<R>,
    date: DateKey,
    task_id: &str,
    raw: &str,
) -> StoreResult<bool> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(false);
    }
    store.update_task_text(date, task_id, text)?;
    Ok(true)
}
