//! Per-day summary projections for detail panels.

use crate::model::date_key::DateKey;
use crate::model::day::DayData;
use crate::model::mood::Mood;

/// Daily water goal in glasses.
pub const WATER_DAILY_GOAL: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskProgress {
    pub completed: usize,
    pub total: usize,
}

impl TaskProgress {
    pub fn of(day: &DayData) -> Self {
        Self {
            completed: day.completed_task_count(),
            total: day.tasks.len(),
        }
    }

    /// Completion percentage; 0 for an empty checklist.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100) / self.total) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaterProgress {
    pub count: u32,
    pub goal: u32,
}

impl WaterProgress {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            goal: WATER_DAILY_GOAL,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.goal.saturating_sub(self.count)
    }

    pub fn reached(&self) -> bool {
        self.count >= self.goal
    }

    /// Progress toward the goal, capped at 100.
    pub fn percent(&self) -> u8 {
        if self.goal == 0 {
            return 100;
        }
        (u64::from(self.count) * 100 / u64::from(self.goal)).min(100) as u8
    }

    /// Glasses beyond the goal-sized display row.
    pub fn extra_glasses(&self) -> u32 {
        self.count.saturating_sub(self.goal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotesStats {
    pub words: usize,
    pub chars: usize,
}

impl NotesStats {
    pub fn of(notes: &str) -> Self {
        Self {
            words: notes.split_whitespace().count(),
            chars: notes.chars().count(),
        }
    }
}

/// Everything the day detail panel shows at a glance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    pub date: DateKey,
    pub tasks: TaskProgress,
    pub water: WaterProgress,
    pub mood: Option<Mood>,
    pub notes: NotesStats,
    pub has_notes: bool,
}

impl DaySummary {
    pub fn of(day: &DayData) -> Self {
        Self {
            date: day.date,
            tasks: TaskProgress::of(day),
            water: WaterProgress::new(day.water_count),
            mood: day.mood,
            notes: NotesStats::of(&day.notes),
            has_notes: day.has_notes(),
        }
    }
}
