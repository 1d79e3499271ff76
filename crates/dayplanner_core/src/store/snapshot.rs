//! Persisted store shape and its JSON blob codec.
//!
//! # Responsibility
//! - Hold day-records in their persisted (possibly stale) shape.
//! - Encode/decode the whole store state as one named blob.
//!
//! # Invariants
//! - Blob layout: `{"state":{"daysData":{..},"selectedDate":..,"isModalOpen":..}}`.
//! - The blob carries no schema version; a top-level `version` written by
//!   older exporters is accepted and ignored.
//! - Fields added after the first release are optional here and filled by
//!   `store::normalize`.

use crate::model::date_key::DateKey;
use crate::model::day::{DayData, Task};
use crate::model::id::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Task as persisted, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTask {
    pub id: TaskId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Absent in records written before calendar visibility existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_calendar: Option<bool>,
    /// Absent or empty in records written before task icons existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Day-record as persisted, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDay {
    /// Informational copy of the map key; the key wins on read.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub tasks: Vec<StoredTask>,
    #[serde(default)]
    pub water_count: i64,
    /// Raw mood name; unknown names normalize to unset.
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&Task> for StoredTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            text: task.text.clone(),
            completed: task.completed,
            created_at: task.created_at,
            show_in_calendar: Some(task.show_in_calendar),
            icon: Some(task.icon.clone()),
        }
    }
}

impl From<&DayData> for StoredDay {
    fn from(day: &DayData) -> Self {
        Self {
            date: Some(day.date.to_string()),
            tasks: day.tasks.iter().map(StoredTask::from).collect(),
            water_count: i64::from(day.water_count),
            mood: day.mood.map(|mood| mood.as_str().to_string()),
            notes: Some(day.notes.clone()),
        }
    }
}

impl From<DayData> for StoredDay {
    fn from(day: DayData) -> Self {
        Self::from(&day)
    }
}

/// Whole store state: day-records plus transient selection state.
///
/// Selection state is persisted alongside the records so a reload reopens
/// the same day.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlannerState {
    pub(crate) days: BTreeMap<DateKey, StoredDay>,
    pub(crate) selected_date: Option<DateKey>,
    pub(crate) is_modal_open: bool,
}

impl PlannerState {
    /// Stored record for a date, in its persisted shape.
    pub fn stored_day(&self, date: DateKey) -> Option<&StoredDay> {
        self.days.get(&date)
    }

    /// Date keys in calendar order.
    pub fn dates(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.days.keys().copied()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn selected_date(&self) -> Option<DateKey> {
        self.selected_date
    }

    pub fn is_modal_open(&self) -> bool {
        self.is_modal_open
    }
}

/// Result of decoding a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSnapshot {
    pub state: PlannerState,
    /// Map keys dropped because they are not canonical date keys.
    pub skipped_keys: Vec<String>,
}

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    state: WireStateOut<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireStateOut<'a> {
    days_data: &'a BTreeMap<DateKey, StoredDay>,
    selected_date: Option<DateKey>,
    is_modal_open: bool,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    #[serde(default)]
    state: WireStateIn,
    #[serde(default)]
    #[allow(dead_code)]
    version: Option<serde_json::Value>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WireStateIn {
    #[serde(default)]
    days_data: BTreeMap<String, StoredDay>,
    #[serde(default)]
    selected_date: Option<String>,
    #[serde(default)]
    is_modal_open: bool,
}

/// Serializes the full state into the blob text.
pub fn encode_snapshot(state: &PlannerState) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeOut {
        state: WireStateOut {
            days_data: &state.days,
            selected_date: state.selected_date,
            is_modal_open: state.is_modal_open,
        },
    })
}

/// Parses blob text into state.
///
/// Non-canonical date keys are dropped and reported; an unparsable
/// `selectedDate` clears the selection.
pub fn decode_snapshot(payload: &str) -> Result<DecodedSnapshot, serde_json::Error> {
    let envelope: EnvelopeIn = serde_json::from_str(payload)?;
    let wire = envelope.state;

    let mut days = BTreeMap::new();
    let mut skipped_keys = Vec::new();
    for (raw_key, day) in wire.days_data {
        match DateKey::parse(&raw_key) {
            Ok(key) => {
                days.insert(key, day);
            }
            Err(_) => skipped_keys.push(raw_key),
        }
    }

    let selected_date = wire
        .selected_date
        .as_deref()
        .and_then(|raw| DateKey::parse(raw).ok());

    Ok(DecodedSnapshot {
        state: PlannerState {
            days,
            selected_date,
            is_modal_open: wire.is_modal_open,
        },
        skipped_keys,
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, encode_snapshot, PlannerState, StoredDay};
    use crate::model::date_key::DateKey;

    #[test]
    fn encode_uses_envelope_and_camel_case_keys() {
        let date = DateKey::parse("2025-03-10").unwrap();
        let mut state = PlannerState::default();
        state.days.insert(
            date,
            StoredDay {
                date: Some(date.to_string()),
                water_count: 3,
                notes: Some(String::new()),
                ..StoredDay::default()
            },
        );
        state.selected_date = Some(date);
        state.is_modal_open = true;

        let value: serde_json::Value =
            serde_json::from_str(&encode_snapshot(&state).unwrap()).unwrap();
        assert_eq!(value["state"]["selectedDate"], "2025-03-10");
        assert_eq!(value["state"]["isModalOpen"], true);
        assert_eq!(value["state"]["daysData"]["2025-03-10"]["waterCount"], 3);
        assert!(value.get("version").is_none());
    }

    #[test]
    fn decode_accepts_exporter_version_and_drops_bad_keys() {
        let payload = r#"{
            "state": {
                "daysData": {
                    "2025-03-10": {"date": "2025-03-10", "tasks": [], "waterCount": 1, "mood": null, "notes": ""},
                    "not-a-date": {"tasks": []}
                },
                "selectedDate": "garbage",
                "isModalOpen": false
            },
            "version": 0
        }"#;

        let decoded = decode_snapshot(payload).unwrap();
        assert_eq!(decoded.skipped_keys, vec!["not-a-date".to_string()]);
        assert_eq!(decoded.state.day_count(), 1);
        assert_eq!(decoded.state.selected_date(), None);
    }

    #[test]
    fn decode_skips_signed_or_unpadded_keys_instead_of_remapping_them() {
        let payload = r#"{
            "state": {
                "daysData": {
                    "+2025-03-1": {"tasks": [], "waterCount": 7},
                    "2025-03-01": {"tasks": [], "waterCount": 1}
                }
            }
        }"#;

        let decoded = decode_snapshot(payload).unwrap();
        assert_eq!(decoded.skipped_keys, vec!["+2025-03-1".to_string()]);
        let date = DateKey::parse("2025-03-01").unwrap();
        assert_eq!(decoded.state.stored_day(date).unwrap().water_count, 1);
    }

    #[test]
    fn decode_tolerates_missing_state_sections() {
        let decoded = decode_snapshot("{}").unwrap();
        assert_eq!(decoded.state, PlannerState::default());
    }
}
