//! Closed mood enumeration for day-records.
//!
//! "Unset" is represented as `Option::<Mood>::None` at the use sites, so an
//! unknown mood is unrepresentable.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Angry,
    Tired,
    Sad,
    Great,
    Fun,
}

impl Mood {
    /// All moods in picker display order.
    pub const ALL: [Mood; 5] = [Mood::Angry, Mood::Tired, Mood::Sad, Mood::Great, Mood::Fun];

    /// Parses the lowercase wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "angry" => Some(Self::Angry),
            "tired" => Some(Self::Tired),
            "sad" => Some(Self::Sad),
            "great" => Some(Self::Great),
            "fun" => Some(Self::Fun),
            _ => None,
        }
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Angry => "angry",
            Self::Tired => "tired",
            Self::Sad => "sad",
            Self::Great => "great",
            Self::Fun => "fun",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Angry => "😡",
            Self::Tired => "😴",
            Self::Sad => "😢",
            Self::Great => "😃",
            Self::Fun => "🤩",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Angry => "Angry",
            Self::Tired => "Tired",
            Self::Sad => "Sad",
            Self::Great => "Great",
            Self::Fun => "Fun",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picker semantics: choosing the current mood again clears it.
///
/// The store never toggles on its own; this is the presentation rule.
pub fn toggle_mood(current: Option<Mood>, clicked: Mood) -> Option<Mood> {
    if current == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}
