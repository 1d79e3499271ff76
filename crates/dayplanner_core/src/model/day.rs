//! Day-record domain model.
//!
//! # Responsibility
//! - Define the canonical `Task` and `DayData` shapes handed to callers.
//! - Provide the zero-value factory for never-touched dates.
//!
//! # Invariants
//! - `DayData::date` equals the key the record is stored under.
//! - Task ids are unique within one day-record; order is insertion order.
//! - `water_count` is unsigned, so it can never go below zero.

use crate::model::date_key::DateKey;
use crate::model::icon::DEFAULT_TASK_ICON;
use crate::model::id::{new_task_id, TaskId};
use crate::model::mood::Mood;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One checklist entry of a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Assigned at creation, immutable afterwards.
    pub id: TaskId,
    /// User label. The store writes it verbatim; blank guards live in
    /// `service::checklist`.
    pub text: String,
    pub completed: bool,
    /// Creation instant, immutable afterwards.
    pub created_at: DateTime<Utc>,
    /// Whether the task renders as a calendar-cell indicator.
    pub show_in_calendar: bool,
    /// Single-glyph label.
    pub icon: String,
}

impl Task {
    /// Creates an incomplete, calendar-visible task with the default icon.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(new_task_id(), text, Utc::now())
    }

    /// Creates a task with caller-provided identity and timestamp.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: TaskId, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            created_at,
            show_in_calendar: true,
            icon: DEFAULT_TASK_ICON.to_string(),
        }
    }
}

/// Aggregate of tasks, water, mood and notes for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayData {
    pub date: DateKey,
    pub tasks: Vec<Task>,
    pub water_count: u32,
    pub mood: Option<Mood>,
    pub notes: String,
}

impl DayData {
    /// Returns the task with the given id.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub(crate) fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Returns whether every field still holds its zero value.
    pub fn is_default(&self) -> bool {
        self.tasks.is_empty()
            && self.water_count == 0
            && self.mood.is_none()
            && self.notes.is_empty()
    }

    /// Tasks flagged for calendar-cell display, in insertion order.
    pub fn calendar_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| task.show_in_calendar)
    }

    pub fn completed_task_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Returns whether notes hold anything besides whitespace.
    pub fn has_notes(&self) -> bool {
        !self.notes.trim().is_empty()
    }
}

/// Zero-value record for a date that has never been touched.
pub fn default_day(date: DateKey) -> DayData {
    DayData {
        date,
        tasks: Vec::new(),
        water_count: 0,
        mood: None,
        notes: String::new(),
    }
}
