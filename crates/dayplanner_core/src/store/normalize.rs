//! Lazy day-record migration.
//!
//! # Responsibility
//! - Upgrade a persisted day-record that predates newer task fields.
//! - Decide when a read must write the upgraded record back.
//!
//! # Invariants
//! - Normalization only fills missing fields; present values (including
//!   `showInCalendar = false`) pass through unchanged.
//! - Normalization is idempotent.
//! - The map key is authoritative for `date`.

use crate::model::date_key::DateKey;
use crate::model::day::{DayData, Task};
use crate::model::icon::DEFAULT_TASK_ICON;
use crate::model::mood::Mood;
use crate::store::snapshot::{StoredDay, StoredTask};

/// Returns whether any task lacks `showInCalendar` or carries an empty icon.
///
/// This is the write-back trigger: only these records are rewritten on read.
pub fn needs_migration(day: &StoredDay) -> bool {
    day.tasks.iter().any(task_needs_migration)
}

fn task_needs_migration(task: &StoredTask) -> bool {
    task.show_in_calendar.is_none() || task.icon.as_deref().map_or(true, str::is_empty)
}

/// Produces the fully populated record for `date`.
pub fn normalize_day(date: DateKey, stored: &StoredDay) -> DayData {
    DayData {
        date,
        tasks: stored.tasks.iter().map(normalize_task).collect(),
        water_count: clamp_water(stored.water_count),
        mood: stored.mood.as_deref().and_then(Mood::parse),
        notes: stored.notes.clone().unwrap_or_default(),
    }
}

/// Normalizes and converts back to the persisted shape.
pub fn migrate_day(date: DateKey, stored: &StoredDay) -> StoredDay {
    StoredDay::from(normalize_day(date, stored))
}

fn normalize_task(task: &StoredTask) -> Task {
    let icon = match task.icon.as_deref() {
        Some(icon) if !icon.is_empty() => icon.to_string(),
        _ => DEFAULT_TASK_ICON.to_string(),
    };

    Task {
        id: task.id.clone(),
        text: task.text.clone(),
        completed: task.completed,
        created_at: task.created_at,
        show_in_calendar: task.show_in_calendar.unwrap_or(true),
        icon,
    }
}

fn clamp_water(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{clamp_water, migrate_day, needs_migration, normalize_day};
    use crate::model::date_key::DateKey;
    use crate::model::icon::DEFAULT_TASK_ICON;
    use crate::model::mood::Mood;
    use crate::store::snapshot::{StoredDay, StoredTask};
    use chrono::{TimeZone, Utc};

    fn legacy_task(id: &str, show: Option<bool>, icon: Option<&str>) -> StoredTask {
        StoredTask {
            id: id.to_string(),
            text: format!("task {id}"),
            completed: false,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
            show_in_calendar: show,
            icon: icon.map(str::to_string),
        }
    }

    #[test]
    fn detects_missing_visibility_and_empty_icon() {
        let clean = StoredDay {
            tasks: vec![legacy_task("a", Some(true), Some("🎯"))],
            ..StoredDay::default()
        };
        assert!(!needs_migration(&clean));

        let missing_flag = StoredDay {
            tasks: vec![legacy_task("a", None, Some("🎯"))],
            ..StoredDay::default()
        };
        assert!(needs_migration(&missing_flag));

        let empty_icon = StoredDay {
            tasks: vec![legacy_task("a", Some(false), Some(""))],
            ..StoredDay::default()
        };
        assert!(needs_migration(&empty_icon));
    }

    #[test]
    fn normalize_fills_only_missing_fields() {
        let date = DateKey::parse("2024-06-01").unwrap();
        let stored = StoredDay {
            date: None,
            tasks: vec![
                legacy_task("a", None, None),
                legacy_task("b", Some(false), Some("")),
                legacy_task("c", Some(false), Some("🏆")),
            ],
            water_count: 2,
            mood: Some("sad".to_string()),
            notes: None,
        };

        let day = normalize_day(date, &stored);
        assert_eq!(day.date, date);
        assert!(day.tasks[0].show_in_calendar);
        assert_eq!(day.tasks[0].icon, DEFAULT_TASK_ICON);
        assert!(!day.tasks[1].show_in_calendar);
        assert_eq!(day.tasks[1].icon, DEFAULT_TASK_ICON);
        assert!(!day.tasks[2].show_in_calendar);
        assert_eq!(day.tasks[2].icon, "🏆");
        assert_eq!(day.water_count, 2);
        assert_eq!(day.mood, Some(Mood::Sad));
        assert_eq!(day.notes, "");
    }

    #[test]
    fn migrate_is_idempotent() {
        let date = DateKey::parse("2024-06-01").unwrap();
        let stored = StoredDay {
            tasks: vec![legacy_task("a", None, Some(""))],
            water_count: 1,
            ..StoredDay::default()
        };

        let once = migrate_day(date, &stored);
        let twice = migrate_day(date, &once);
        assert_eq!(once, twice);
        assert!(!needs_migration(&once));
        assert_eq!(
            serde_json::to_string(&once).unwrap(),
            serde_json::to_string(&twice).unwrap()
        );
    }

    #[test]
    fn unknown_mood_and_negative_water_normalize_to_defaults() {
        let date = DateKey::parse("2024-06-01").unwrap();
        let stored = StoredDay {
            water_count: -4,
            mood: Some("ecstatic".to_string()),
            ..StoredDay::default()
        };
        let day = normalize_day(date, &stored);
        assert_eq!(day.water_count, 0);
        assert_eq!(day.mood, None);
        assert_eq!(clamp_water(i64::MAX), u32::MAX);
    }
}
