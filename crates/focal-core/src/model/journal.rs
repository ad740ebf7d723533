use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::ParseEnumError;
use super::id::Id;

/// The fixed set of weekly-review sections. A week is complete only when
/// every section is covered by at least one counting entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewSection {
    Reflect,
    Overdue,
    Upcoming,
    Projects,
    LifeAreas,
}

impl ReviewSection {
    /// Every section, in the order they are presented in a review.
    pub const ALL: [Self; 5] = [
        Self::Reflect,
        Self::Overdue,
        Self::Upcoming,
        Self::Projects,
        Self::LifeAreas,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Reflect => "reflect",
            Self::Overdue => "overdue",
            Self::Upcoming => "upcoming",
            Self::Projects => "projects",
            Self::LifeAreas => "life-areas",
        }
    }
}

impl fmt::Display for ReviewSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewSection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match super::normalize(s).as_str() {
            "reflect" => Ok(Self::Reflect),
            "overdue" => Ok(Self::Overdue),
            "upcoming" => Ok(Self::Upcoming),
            "projects" => Ok(Self::Projects),
            "life-areas" => Ok(Self::LifeAreas),
            _ => Err(ParseEnumError {
                expected: "review section",
                got: s.to_string(),
            }),
        }
    }
}

/// One journal entry, attributed to an ISO week for the weekly review.
///
/// `week_number`/`week_year` may be absent on entries written by older
/// clients; they are backfilled from `date` on read ([`JournalEntry::backfill_week`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JournalEntry {
    pub id: Id,
    pub date: NaiveDate,
    pub content: String,
    pub week_number: Option<u32>,
    pub week_year: Option<i32>,
    pub section: Option<ReviewSection>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for JournalEntry {
    fn default() -> Self {
        Self {
            id: Id::generate(),
            date: NaiveDate::default(),
            content: String::new(),
            week_number: None,
            week_year: None,
            section: None,
            is_completed: false,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }
}

impl JournalEntry {
    #[must_use]
    pub fn new(date: NaiveDate, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        let week = date.iso_week();
        Self {
            id: Id::generate(),
            date,
            content: content.into(),
            week_number: Some(week.week()),
            week_year: Some(week.year()),
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    /// Fill missing ISO week metadata from the entry's calendar date.
    /// Returns `true` if anything changed. A one-time repair on read, not a
    /// recurring migration.
    pub fn backfill_week(&mut self) -> bool {
        if self.week_number.is_some() && self.week_year.is_some() {
            return false;
        }
        let week = self.date.iso_week();
        self.week_number = Some(week.week());
        self.week_year = Some(week.year());
        true
    }

    /// The `"{weekYear}-W{week:02}"` grouping key. Week numbers are
    /// zero-padded so lexicographic order matches chronological order.
    #[must_use]
    pub fn week_key(&self) -> String {
        let week = self.date.iso_week();
        let year = self.week_year.unwrap_or_else(|| week.year());
        let number = self.week_number.unwrap_or_else(|| week.week());
        format!("{year:04}-W{number:02}")
    }

    /// Whether this entry counts toward section coverage: explicitly marked
    /// complete, or carrying non-empty trimmed content.
    #[must_use]
    pub fn counts_toward_review(&self) -> bool {
        self.is_completed || !self.content.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
    }

    #[test]
    fn section_wire_names_are_kebab_case() {
        let json = serde_json::to_string(&ReviewSection::LifeAreas).expect("serialize");
        assert_eq!(json, "\"life-areas\"");
        assert_eq!("life-areas".parse::<ReviewSection>(), Ok(ReviewSection::LifeAreas));
    }

    #[test]
    fn new_entry_gets_iso_week() {
        // 2026-01-01 falls in ISO week 1 of 2026.
        let entry = JournalEntry::new(d(2026, 1, 1), "notes", Utc::now());
        assert_eq!(entry.week_number, Some(1));
        assert_eq!(entry.week_year, Some(2026));
    }

    #[test]
    fn backfill_repairs_missing_week_metadata() {
        // 2027-01-01 is a Friday in ISO week 53 of 2026.
        let mut entry = JournalEntry {
            date: d(2027, 1, 1),
            week_number: None,
            week_year: None,
            ..JournalEntry::default()
        };
        assert!(entry.backfill_week());
        assert_eq!(entry.week_number, Some(53));
        assert_eq!(entry.week_year, Some(2026));
        // Second call is a no-op.
        assert!(!entry.backfill_week());
    }

    #[test]
    fn week_key_is_zero_padded() {
        let entry = JournalEntry::new(d(2026, 3, 2), "x", Utc::now());
        assert_eq!(entry.week_key(), "2026-W10");
        let early = JournalEntry::new(d(2026, 1, 7), "x", Utc::now());
        assert_eq!(early.week_key(), "2026-W02");
    }

    #[test]
    fn counting_rules() {
        let mut entry = JournalEntry::new(d(2026, 1, 7), "  ", Utc::now());
        assert!(!entry.counts_toward_review());
        entry.is_completed = true;
        assert!(entry.counts_toward_review());
        entry.is_completed = false;
        entry.content = "went well".into();
        assert!(entry.counts_toward_review());
    }
}
