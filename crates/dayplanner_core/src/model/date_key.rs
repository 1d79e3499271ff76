//! Canonical calendar-date keys.
//!
//! # Responsibility
//! - Identify one day-record by its local calendar date.
//! - Keep the `YYYY-MM-DD` wire form in one place.
//!
//! # Invariants
//! - A `DateKey` always renders as a zero-padded `YYYY-MM-DD` string.
//! - `today()` is derived from the local calendar, never from UTC time, so
//!   two observers in the same locale agree on the key for a wall-clock day.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Malformed date-key input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateKeyError {
    input: String,
}

impl DateKeyError {
    /// Returns the rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Display for DateKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date key `{}`; expected YYYY-MM-DD", self.input)
    }
}

impl Error for DateKeyError {}

/// Canonical key of one day-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Parses a strict `YYYY-MM-DD` key.
    ///
    /// Surrounding whitespace is ignored; any other deviation from the
    /// canonical form (sign, missing zero padding, time suffix) is rejected.
    pub fn parse(value: &str) -> Result<Self, DateKeyError> {
        let trimmed = value.trim();
        let rejected = || DateKeyError {
            input: value.to_string(),
        };
        let key = NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|_| rejected())?;
        if key.to_string() != trimmed {
            return Err(rejected());
        }
        Ok(key)
    }

    /// Key for the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Key for a year/month/day triple, `None` when the date does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Key for today's date in the local timezone.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
