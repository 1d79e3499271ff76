//! Debounced notes editing buffer.
//!
//! # Responsibility
//! - Buffer keystroke-level notes edits outside the store.
//! - Commit the buffered text through `set_notes` after a quiet period.
//!
//! # Invariants
//! - Each edit restarts the quiet period; at most one commit is pending.
//! - An edit that returns the text to the saved value cancels the pending
//!   commit.
//! - `cancel` drops a pending commit; that edit is lost.
//! - The clock is injected so callers (and tests) own time.

use crate::model::date_key::DateKey;
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::service::day_summary::NotesStats;
use crate::store::{PlannerStore, StoreResult};
use std::time::{Duration, Instant};

/// Save indicator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStatus {
    /// Local text equals the stored notes.
    Saved,
    /// Local text differs and no commit is scheduled.
    Unsaved,
    /// A commit is scheduled for the end of the quiet period.
    Saving,
}

#[derive(Debug, Clone)]
pub struct NotesDraft {
    date: DateKey,
    saved: String,
    local: String,
    quiet_period: Duration,
    deadline: Option<Instant>,
}

impl NotesDraft {
    pub fn new(date: DateKey, saved_notes: impl Into<String>, quiet_period: Duration) -> Self {
        let saved = saved_notes.into();
        Self {
            date,
            local: saved.clone(),
            saved,
            quiet_period,
            deadline: None,
        }
    }

    /// Starts a draft from the store's current notes for `date`.
    pub fn for_day<R: SnapshotRepository>(
        store: &PlannerStore<R>,
        date: DateKey,
        quiet_period: Duration,
    ) -> Self {
        Self::new(date, store.peek(date).notes, quiet_period)
    }

    pub fn date(&self) -> DateKey {
        self.date
    }

    pub fn text(&self) -> &str {
        &self.local
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Instant at which the pending commit becomes due.
    pub fn due_at(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn status(&self) -> DraftStatus {
        if self.deadline.is_some() {
            DraftStatus::Saving
        } else if self.local == self.saved {
            DraftStatus::Saved
        } else {
            DraftStatus::Unsaved
        }
    }

    pub fn stats(&self) -> NotesStats {
        NotesStats::of(&self.local)
    }

    /// Replaces the local text and restarts the quiet period.
    pub fn edit(&mut self, text: impl Into<String>, now: Instant) {
        self.local = text.into();
        self.deadline = if self.local == self.saved {
            None
        } else {
            Some(now + self.quiet_period)
        };
    }

    /// Clears the local text; commits after the quiet period like any edit.
    pub fn clear(&mut self, now: Instant) {
        self.edit(String::new(), now);
    }

    /// Returns the text to commit once the quiet period has elapsed.
    ///
    /// The draft treats the returned text as saved.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.saved = self.local.clone();
                Some(self.local.clone())
            }
            _ => None,
        }
    }

    /// Writes the buffered text through the store when due.
    ///
    /// Returns whether a commit happened. On a persistence failure the draft
    /// keeps its text and reports `Unsaved`.
    pub fn commit_due<R: SnapshotRepository>(
        &mut self,
        store: &mut PlannerStore<R>,
        now: Instant,
    ) -> StoreResult<bool> {
        let previous_saved = self.saved.clone();
        let Some(text) = self.poll(now) else {
            return Ok(false);
        };
        if let Err(err) = store.set_notes(self.date, text) {
            self.saved = previous_saved;
            return Err(err);
        }
        Ok(true)
    }

    /// Abandons the pending commit (panel closed or day switched).
    ///
    /// Returns the text that will not be saved, if any.
    pub fn cancel(&mut self) -> Option<String> {
        self.deadline
            .take()
            .map(|_| std::mem::replace(&mut self.local, self.saved.clone()))
    }

    /// Re-bases the draft on notes that changed in the store.
    ///
    /// Drops any local edit, matching a reload of the notes widget.
    pub fn sync_saved(&mut self, notes: impl Into<String>) {
        self.saved = notes.into();
        self.local = self.saved.clone();
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{DraftStatus, NotesDraft};
    use crate::model::date_key::DateKey;
    use std::time::{Duration, Instant};

    const QUIET: Duration = Duration::from_millis(1000);

    fn draft() -> NotesDraft {
        NotesDraft::new(DateKey::parse("2025-03-10").unwrap(), "", QUIET)
    }

    #[test]
    fn edits_restart_the_quiet_period() {
        let start = Instant::now();
        let mut draft = draft();

        draft.edit("h", start);
        draft.edit("hi", start + Duration::from_millis(900));
        assert_eq!(draft.poll(start + Duration::from_millis(1000)), None);
        assert_eq!(draft.status(), DraftStatus::Saving);

        assert_eq!(
            draft.poll(start + Duration::from_millis(1900)).as_deref(),
            Some("hi")
        );
        assert_eq!(draft.status(), DraftStatus::Saved);
        assert_eq!(draft.poll(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn reverting_to_saved_text_cancels_pending_commit() {
        let start = Instant::now();
        let mut draft = draft();
        draft.edit("typo", start);
        draft.edit("", start + Duration::from_millis(10));
        assert!(!draft.is_pending());
        assert_eq!(draft.poll(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn cancel_drops_the_pending_edit() {
        let start = Instant::now();
        let mut draft = draft();
        draft.edit("lost words", start);

        assert_eq!(draft.cancel().as_deref(), Some("lost words"));
        assert_eq!(draft.text(), "");
        assert_eq!(draft.status(), DraftStatus::Saved);
        assert_eq!(draft.cancel(), None);
    }

    #[test]
    fn stats_follow_local_text() {
        let mut draft = draft();
        draft.edit("two words", Instant::now());
        assert_eq!(draft.stats().words, 2);
        assert_eq!(draft.stats().chars, 9);
    }
}
