//! Weekly review aggregation.
//!
//! Journal entries are grouped by ISO week; the most recent week with any
//! entries is the review week. A week is complete only when every one of
//! the five fixed sections is covered by at least one entry that is marked
//! complete or carries non-empty trimmed content.
//!
//! Week keys are `"{weekYear}-W{week:02}"`. The zero-padding matters:
//! without it, week "9" would sort after week "10" lexicographically and
//! the wrong week would be picked.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{JournalEntry, ReviewSection};

/// Completeness report for one ISO week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekReview {
    /// The `"{weekYear}-W{week:02}"` key of the reviewed week.
    pub week_key: String,
    /// Sections covered by at least one counting entry, in section order.
    pub covered: Vec<ReviewSection>,
    /// Sections with no counting entry yet, in section order.
    pub missing: Vec<ReviewSection>,
    /// Number of entries attributed to the week (counting or not).
    pub entry_count: usize,
}

impl WeekReview {
    /// A week is complete when no required section is missing.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

impl fmt::Display for WeekReview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} sections",
            self.week_key,
            self.covered.len(),
            ReviewSection::ALL.len()
        )
    }
}

/// Review the most recent week that has journal entries. `None` when the
/// journal is empty.
#[must_use]
pub fn latest_week(entries: &[JournalEntry]) -> Option<WeekReview> {
    // BTreeMap keys are the zero-padded week keys, so the last entry is the
    // most recent week.
    let mut weeks: BTreeMap<String, Vec<&JournalEntry>> = BTreeMap::new();
    for entry in entries {
        weeks.entry(entry.week_key()).or_default().push(entry);
    }

    let (week_key, week_entries) = weeks.into_iter().next_back()?;
    Some(review_week(week_key, &week_entries))
}

fn review_week(week_key: String, entries: &[&JournalEntry]) -> WeekReview {
    let mut covered = Vec::new();
    let mut missing = Vec::new();
    for section in ReviewSection::ALL {
        let has_counting_entry = entries
            .iter()
            .any(|e| e.section == Some(section) && e.counts_toward_review());
        if has_counting_entry {
            covered.push(section);
        } else {
            missing.push(section);
        }
    }
    WeekReview {
        week_key,
        covered,
        missing,
        entry_count: entries.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn entry(date: NaiveDate, section: Option<ReviewSection>, content: &str) -> JournalEntry {
        let mut entry = JournalEntry::new(date, content, Utc::now());
        entry.section = section;
        entry
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).expect("valid date")
    }

    #[test]
    fn empty_journal_has_no_review_week() {
        assert!(latest_week(&[]).is_none());
    }

    #[test]
    fn four_of_five_sections_is_incomplete() {
        let date = d(3, 2);
        let mut entries: Vec<JournalEntry> = [
            ReviewSection::Reflect,
            ReviewSection::Overdue,
            ReviewSection::Upcoming,
            ReviewSection::Projects,
        ]
        .into_iter()
        .map(|s| entry(date, Some(s), "covered"))
        .collect();

        let review = latest_week(&entries).expect("review");
        assert!(!review.is_complete());
        assert_eq!(review.missing, vec![ReviewSection::LifeAreas]);

        entries.push(entry(date, Some(ReviewSection::LifeAreas), "balanced"));
        let review = latest_week(&entries).expect("review");
        assert!(review.is_complete());
    }

    #[test]
    fn empty_unmarked_entries_do_not_count() {
        let date = d(3, 2);
        let blank = entry(date, Some(ReviewSection::Reflect), "   ");
        let review = latest_week(std::slice::from_ref(&blank)).expect("review");
        assert!(review.missing.contains(&ReviewSection::Reflect));

        let mut marked = blank;
        marked.is_completed = true;
        let review = latest_week(&[marked]).expect("review");
        assert!(review.covered.contains(&ReviewSection::Reflect));
    }

    #[test]
    fn most_recent_week_is_picked() {
        let old = entry(d(1, 7), Some(ReviewSection::Reflect), "old week");
        let new = entry(d(3, 2), Some(ReviewSection::Overdue), "new week");
        let review = latest_week(&[old, new]).expect("review");
        assert_eq!(review.week_key, "2026-W10");
        assert_eq!(review.entry_count, 1);
    }

    #[test]
    fn single_digit_weeks_sort_before_double_digit() {
        // Week 9 vs week 10 — the zero-padded key must pick week 10.
        let week9 = entry(d(2, 25), Some(ReviewSection::Reflect), "w9");
        let week10 = entry(d(3, 4), Some(ReviewSection::Reflect), "w10");
        let review = latest_week(&[week10.clone(), week9]).expect("review");
        assert_eq!(review.week_key, "2026-W10");
    }

    #[test]
    fn sectionless_entries_count_toward_entry_count_only() {
        let date = d(3, 2);
        let noted = entry(date, None, "free-form note");
        let review = latest_week(&[noted]).expect("review");
        assert_eq!(review.entry_count, 1);
        assert!(review.covered.is_empty());
    }
}
