//! Month grid and calendar-cell projections.
//!
//! # Responsibility
//! - Lay out a month as a fixed 6x7 grid of dates.
//! - Project day-records into compact cell indicators.
//! - Route day clicks into store selection state.
//!
//! # Invariants
//! - Grids always hold 42 dates and weeks start on Sunday.
//! - Month views read through `PlannerStore::peek` and never write.

use crate::model::date_key::DateKey;
use crate::model::day::DayData;
use crate::model::id::TaskId;
use crate::model::mood::Mood;
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::store::{PlannerStore, StoreResult};
use chrono::{Datelike, Days, Months, NaiveDate};

pub const CALENDAR_GRID_CELLS: usize = 42;
/// Tasks shown inside one cell before collapsing into a counter.
pub const MAX_CELL_TASKS: usize = 2;

/// Month currently displayed by a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    /// Returns `None` for months outside the supported date range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// Month containing `date`.
    pub fn of(date: DateKey) -> Self {
        let date = date.date();
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn prev(&self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
            .unwrap_or(*self)
    }

    pub fn contains(&self, date: DateKey) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// English month name for headers.
    pub fn month_name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        NAMES[self.first.month0() as usize]
    }
}

/// Short weekday headers, Sunday first.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Returns the 42 dates displayed for a month.
///
/// Leading cells come from the previous month and trailing cells from the
/// next one.
pub fn month_grid(cursor: MonthCursor) -> Vec<DateKey> {
    let first = cursor.first_day();
    let start = first - Days::new(u64::from(first.weekday().num_days_from_sunday()));
    (0..CALENDAR_GRID_CELLS as u64)
        .map(|offset| DateKey::from_date(start + Days::new(offset)))
        .collect()
}

/// One task line rendered inside a calendar cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskIndicator {
    pub id: TaskId,
    pub icon: String,
    pub text: String,
    pub completed: bool,
}

/// Compact summary rendered inside a calendar cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellIndicators {
    /// At most `MAX_CELL_TASKS`, incomplete tasks first.
    pub tasks: Vec<TaskIndicator>,
    /// Calendar-visible tasks that did not fit.
    pub hidden_task_count: usize,
    /// Present when at least one glass was logged.
    pub water_count: Option<u32>,
    pub mood: Option<Mood>,
    pub has_notes: bool,
}

impl CellIndicators {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
            && self.hidden_task_count == 0
            && self.water_count.is_none()
            && self.mood.is_none()
            && !self.has_notes
    }
}

/// Projects a day-record into cell indicators.
///
/// Only tasks with `show_in_calendar` are considered. Incomplete tasks are
/// listed before completed ones, each group keeping insertion order.
pub fn cell_indicators(day: &DayData) -> CellIndicators {
    let (incomplete, completed): (Vec<_>, Vec<_>) =
        day.calendar_tasks().partition(|task| !task.completed);
    let visible_total = incomplete.len() + completed.len();

    let tasks: Vec<TaskIndicator> = incomplete
        .into_iter()
        .chain(completed)
        .take(MAX_CELL_TASKS)
        .map(|task| TaskIndicator {
            id: task.id.clone(),
            icon: task.icon.clone(),
            text: task.text.clone(),
            completed: task.completed,
        })
        .collect();

    CellIndicators {
        hidden_task_count: visible_total - tasks.len(),
        tasks,
        water_count: (day.water_count > 0).then_some(day.water_count),
        mood: day.mood,
        has_notes: day.has_notes(),
    }
}

/// One rendered grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: DateKey,
    pub in_month: bool,
    pub is_today: bool,
    /// `None` for untouched days and days with nothing to show.
    pub indicators: Option<CellIndicators>,
}

/// Builds the 42 cells for a month without touching the store.
pub fn month_view<R: SnapshotRepository>(
    store: &PlannerStore<R>,
    cursor: MonthCursor,
    today: DateKey,
) -> Vec<CalendarCell> {
    month_grid(cursor)
        .into_iter()
        .map(|date| {
            let indicators = store
                .contains_day(date)
                .then(|| cell_indicators(&store.peek(date)))
                .filter(|indicators| !indicators.is_empty());
            CalendarCell {
                date,
                in_month: cursor.contains(date),
                is_today: date == today,
                indicators,
            }
        })
        .collect()
}

/// Selects a clicked day and opens its detail panel.
///
/// Clicks on leading/trailing cells of other months are ignored and return
/// `false`.
pub fn open_day<R: SnapshotRepository>(
    store: &mut PlannerStore<R>,
    cursor: MonthCursor,
    date: DateKey,
) -> StoreResult<bool> {
    if !cursor.contains(date) {
        return Ok(false);
    }
    store.set_selected_date(Some(date))?;
    store.set_modal_open(true)?;
    Ok(true)
}

/// Closes the detail panel, keeping the selected date.
pub fn close_day<R: SnapshotRepository>(store: &mut PlannerStore<R>) -> StoreResult<()> {
    store.set_modal_open(false)
}

#[cfg(test)]
mod tests {
    use super::{cell_indicators, month_grid, MonthCursor, CALENDAR_GRID_CELLS};
    use crate::model::date_key::DateKey;
    use crate::model::day::{default_day, Task};
    use crate::model::mood::Mood;
    use chrono::{Datelike, Weekday};

    #[test]
    fn grid_starts_on_sunday_and_spans_six_weeks() {
        let cursor = MonthCursor::new(2025, 3).unwrap();
        let grid = month_grid(cursor);

        assert_eq!(grid.len(), CALENDAR_GRID_CELLS);
        assert_eq!(grid[0].date().weekday(), Weekday::Sun);
        // 2025-03-01 is a Saturday: six leading February days.
        assert_eq!(grid[0].to_string(), "2025-02-23");
        assert_eq!(grid[6].to_string(), "2025-03-01");
        assert_eq!(grid[41].to_string(), "2025-04-05");
    }

    #[test]
    fn month_starting_on_sunday_has_no_leading_days() {
        let cursor = MonthCursor::new(2025, 6).unwrap();
        let grid = month_grid(cursor);
        assert_eq!(grid[0].to_string(), "2025-06-01");
    }

    #[test]
    fn cursor_navigation_wraps_years() {
        let january = MonthCursor::new(2025, 1).unwrap();
        assert_eq!(january.prev(), MonthCursor::new(2024, 12).unwrap());
        assert_eq!(january.prev().next(), january);
        assert_eq!(
            MonthCursor::of(DateKey::parse("2025-01-31").unwrap()),
            january
        );
        assert_eq!(january.month_name(), "January");
    }

    #[test]
    fn indicators_prioritize_incomplete_visible_tasks() {
        let mut day = default_day(DateKey::parse("2025-03-10").unwrap());
        let mut done = Task::new("done");
        done.completed = true;
        let mut hidden = Task::new("hidden");
        hidden.show_in_calendar = false;
        day.tasks = vec![done, hidden, Task::new("first open"), Task::new("second open")];
        day.water_count = 2;
        day.mood = Some(Mood::Great);
        day.notes = "  \n ".to_string();

        let indicators = cell_indicators(&day);
        let texts: Vec<_> = indicators.tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first open", "second open"]);
        assert_eq!(indicators.hidden_task_count, 1);
        assert_eq!(indicators.water_count, Some(2));
        assert_eq!(indicators.mood, Some(Mood::Great));
        assert!(!indicators.has_notes);
    }

    #[test]
    fn default_day_has_empty_indicators() {
        let day = default_day(DateKey::parse("2025-03-10").unwrap());
        assert!(cell_indicators(&day).is_empty());
    }
}
