//! The entity store and mutation engine.
//!
//! [`Store`] is the single authoritative owner of all entity collections.
//! Consumers read snapshots and call mutation methods; nothing else may
//! mutate entities in place. Every mutation entry point takes an explicit
//! `now` timestamp so behavior is deterministic under test, and maintains
//! two standing guarantees:
//!
//! - parent/subtask linkage is bidirectional and never one-sided;
//! - no task retains a dangling project/category reference after the
//!   referenced entity is deleted.
//!
//! Mutations are split by entity family: task operations in [`tasks`],
//! projects/categories in [`collections`], the daily planner in [`plans`],
//! the shift calendar in [`shifts`], journal entries in [`journal`].

mod collections;
mod journal;
mod plans;
mod shifts;
mod tasks;

pub use tasks::NewTask;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::{Category, DailyPlan, Id, JournalEntry, Project, Task, WorkSchedule};
use crate::undo::UndoBuffer;

/// Owned container for every entity collection. This is the unit the
/// persistence layer reads and writes, and the shape the portable export
/// format mirrors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub categories: Vec<Category>,
    pub daily_plans: Vec<DailyPlan>,
    pub work_schedule: WorkSchedule,
    pub journal_entries: Vec<JournalEntry>,
}

/// The in-memory entity store and its transient undo buffer.
#[derive(Debug, Clone)]
pub struct Store {
    data: Snapshot,
    undo: UndoBuffer,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Empty store with the default undo window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Snapshot::default(),
            undo: UndoBuffer::default(),
        }
    }

    /// Empty store with a custom undo window.
    #[must_use]
    pub fn with_undo_window(window_seconds: u64) -> Self {
        Self {
            data: Snapshot::default(),
            undo: UndoBuffer::new(window_seconds),
        }
    }

    /// Build a store from loaded data, applying one-time read repairs:
    /// journal entries missing ISO week metadata are backfilled from their
    /// dates, and duplicate daily plans for one date are collapsed (first
    /// occurrence wins).
    #[must_use]
    pub fn from_snapshot(mut snapshot: Snapshot, undo: UndoBuffer) -> Self {
        let backfilled = snapshot
            .journal_entries
            .iter_mut()
            .map(|entry| entry.backfill_week())
            .filter(|&changed| changed)
            .count();
        if backfilled > 0 {
            tracing::info!(backfilled, "backfilled journal week metadata");
        }

        let mut seen: HashSet<NaiveDate> = HashSet::new();
        let before = snapshot.daily_plans.len();
        snapshot.daily_plans.retain(|plan| seen.insert(plan.date));
        if snapshot.daily_plans.len() < before {
            tracing::warn!(
                dropped = before - snapshot.daily_plans.len(),
                "collapsed duplicate daily plans"
            );
        }

        Self {
            data: snapshot,
            undo,
        }
    }

    /// The current snapshot of all collections.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.data
    }

    /// The undo buffer (read-only; mutations go through task operations).
    #[must_use]
    pub fn undo_buffer(&self) -> &UndoBuffer {
        &self.undo
    }

    // -- read access ---------------------------------------------------------

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.data.tasks
    }

    #[must_use]
    pub fn task(&self, id: Id) -> Option<&Task> {
        self.data.tasks.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.data.projects
    }

    #[must_use]
    pub fn project(&self, id: Id) -> Option<&Project> {
        self.data.projects.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    #[must_use]
    pub fn category(&self, id: Id) -> Option<&Category> {
        self.data.categories.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn daily_plans(&self) -> &[DailyPlan] {
        &self.data.daily_plans
    }

    #[must_use]
    pub fn plan_for(&self, date: NaiveDate) -> Option<&DailyPlan> {
        self.data.daily_plans.iter().find(|p| p.date == date)
    }

    #[must_use]
    pub fn schedule(&self) -> &WorkSchedule {
        &self.data.work_schedule
    }

    #[must_use]
    pub fn journal_entries(&self) -> &[JournalEntry] {
        &self.data.journal_entries
    }

    #[must_use]
    pub fn journal_entry(&self, id: Id) -> Option<&JournalEntry> {
        self.data.journal_entries.iter().find(|e| e.id == id)
    }

    /// Resolve a task id from its string form, if the task exists.
    #[must_use]
    pub fn resolve_task(&self, raw: &str) -> Option<&Task> {
        let id: Id = raw.parse().ok()?;
        self.task(id)
    }

    // -- internal helpers shared by mutation modules -------------------------

    pub(crate) fn data_mut(&mut self) -> &mut Snapshot {
        &mut self.data
    }

    pub(crate) fn undo_mut(&mut self) -> &mut UndoBuffer {
        &mut self.undo
    }

    pub(crate) fn task_mut(&mut self, id: Id) -> Option<&mut Task> {
        self.data.tasks.iter_mut().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn snapshot_serializes_with_export_keys() {
        let json = serde_json::to_value(Snapshot::default()).expect("serialize");
        for key in [
            "tasks",
            "projects",
            "categories",
            "dailyPlans",
            "workSchedule",
            "journalEntries",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn from_snapshot_backfills_journal_weeks() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
        let entry = JournalEntry {
            date,
            week_number: None,
            week_year: None,
            ..JournalEntry::default()
        };
        let snapshot = Snapshot {
            journal_entries: vec![entry],
            ..Snapshot::default()
        };
        let store = Store::from_snapshot(snapshot, UndoBuffer::default());
        assert_eq!(store.journal_entries()[0].week_number, Some(10));
        assert_eq!(store.journal_entries()[0].week_year, Some(2026));
    }

    #[test]
    fn from_snapshot_collapses_duplicate_plan_dates() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date");
        let now = Utc::now();
        let snapshot = Snapshot {
            daily_plans: vec![DailyPlan::new(date, now), DailyPlan::new(date, now)],
            ..Snapshot::default()
        };
        let store = Store::from_snapshot(snapshot, UndoBuffer::default());
        assert_eq!(store.daily_plans().len(), 1);
    }
}
