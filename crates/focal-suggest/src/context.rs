use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use focal_core::model::{Energy, ParseEnumError};

/// How much time the user has right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Short,
    #[default]
    Medium,
    Long,
}

impl TimeWindow {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            _ => Err(ParseEnumError {
                expected: "time window",
                got: s.to_string(),
            }),
        }
    }
}

/// The user's situation when asking "what now".
///
/// `blockers` is carried through to the caller for display but is not a
/// filter predicate — reserved behavior, kept explicit rather than
/// silently invented.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Context {
    pub available_time: TimeWindow,
    pub energy_level: Energy,
    pub blockers: Vec<String>,
}

impl Context {
    #[must_use]
    pub fn new(available_time: TimeWindow, energy_level: Energy) -> Self {
        Self {
            available_time,
            energy_level,
            blockers: Vec::new(),
        }
    }
}
