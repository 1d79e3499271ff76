//! Synchronous change notification for store consumers.
//!
//! Listeners run on the caller's thread right after a change is committed
//! and persisted. There is no buffering and no async delivery.

use crate::model::date_key::DateKey;
use crate::store::snapshot::PlannerState;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Which operation produced a committed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A read created the default record for an untouched date.
    DayMaterialized,
    /// A read upgraded a stale record and wrote it back.
    DayMigrated,
    TaskAdded,
    TaskToggled,
    TaskDeleted,
    TaskVisibilityToggled,
    TaskIconSet,
    TaskTextUpdated,
    WaterSet,
    WaterIncremented,
    WaterDecremented,
    MoodSet,
    NotesSet,
    SelectedDateSet,
    ModalOpenSet,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DayMaterialized => "day_materialized",
            Self::DayMigrated => "day_migrated",
            Self::TaskAdded => "task_added",
            Self::TaskToggled => "task_toggled",
            Self::TaskDeleted => "task_deleted",
            Self::TaskVisibilityToggled => "task_visibility_toggled",
            Self::TaskIconSet => "task_icon_set",
            Self::TaskTextUpdated => "task_text_updated",
            Self::WaterSet => "water_set",
            Self::WaterIncremented => "water_incremented",
            Self::WaterDecremented => "water_decremented",
            Self::MoodSet => "mood_set",
            Self::NotesSet => "notes_set",
            Self::SelectedDateSet => "selected_date_set",
            Self::ModalOpenSet => "modal_open_set",
        }
    }
}

/// Notification payload.
#[derive(Debug, Clone, Copy)]
pub struct StoreChange<'a> {
    /// Store revision after this change.
    pub revision: u64,
    pub kind: ChangeKind,
    /// Affected day, `None` for selection-state changes.
    pub date: Option<DateKey>,
    /// Full state after this change.
    pub state: &'a PlannerState,
}

pub type Listener = Box<dyn FnMut(&StoreChange<'_>)>;

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl ObserverRegistry {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Calls listeners in subscription order.
    pub(crate) fn notify(&mut self, change: &StoreChange<'_>) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(change);
        }
    }
}
