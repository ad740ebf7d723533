//! Portable import/export format.
//!
//! A focal export is a single JSON object:
//!
//! ```json
//! {
//!   "tasks": [...],
//!   "projects": [...],
//!   "categories": [...],
//!   "dailyPlans": [...],
//!   "workSchedule": {...},
//!   "journalEntries": [...],
//!   "exportDate": "2026-08-07T12:00:00Z",
//!   "version": 1
//! }
//! ```
//!
//! Import accepts any payload carrying at least one recognized collection
//! key and merges it by id (same id overwrites, new ids append; absent keys
//! leave the matching collection untouched). A payload with none of the
//! recognized keys is rejected with a descriptive error — never a silent
//! partial import. After merging, journal week metadata is backfilled and
//! linkage is deterministically repaired, so an import can never leave the
//! store violating its invariants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CoreError;
use crate::model::{Category, DailyPlan, JournalEntry, Project, Task, WorkSchedule};
use crate::store::Store;
use crate::verify;

/// Version tag written by this build and accepted on import.
pub const FORMAT_VERSION: u32 = 1;

/// The on-the-wire export shape. Every field is optional on read so import
/// can detect which keys a payload actually carries; [`export`] always
/// fills all of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportFile {
    pub tasks: Option<Vec<Task>>,
    pub projects: Option<Vec<Project>>,
    pub categories: Option<Vec<Category>>,
    pub daily_plans: Option<Vec<DailyPlan>>,
    pub work_schedule: Option<WorkSchedule>,
    pub journal_entries: Option<Vec<JournalEntry>>,
    pub export_date: Option<DateTime<Utc>>,
    pub version: Option<u32>,
}

impl ExportFile {
    /// Parse a payload from JSON text.
    ///
    /// # Errors
    ///
    /// `ImportFormat` when the text is not a JSON object of the expected
    /// shape.
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        serde_json::from_str(text)
            .map_err(|e| CoreError::ImportFormat(format!("payload is not a focal export: {e}")))
    }

    /// Number of recognized collection keys present in the payload.
    #[must_use]
    pub fn recognized_collections(&self) -> usize {
        usize::from(self.tasks.is_some())
            + usize::from(self.projects.is_some())
            + usize::from(self.categories.is_some())
            + usize::from(self.daily_plans.is_some())
            + usize::from(self.work_schedule.is_some())
            + usize::from(self.journal_entries.is_some())
    }
}

/// What an import did, per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub tasks: usize,
    pub projects: usize,
    pub categories: usize,
    pub daily_plans: usize,
    pub shifts: usize,
    pub journal_entries: usize,
    /// Linkage fixes applied after the merge (relinked + severed + scrubbed).
    pub repaired: usize,
}

/// Serialize the full store into an export file stamped `exported_at`.
#[must_use]
pub fn export(store: &Store, exported_at: DateTime<Utc>) -> ExportFile {
    let snapshot = store.snapshot();
    ExportFile {
        tasks: Some(snapshot.tasks.clone()),
        projects: Some(snapshot.projects.clone()),
        categories: Some(snapshot.categories.clone()),
        daily_plans: Some(snapshot.daily_plans.clone()),
        work_schedule: Some(snapshot.work_schedule.clone()),
        journal_entries: Some(snapshot.journal_entries.clone()),
        export_date: Some(exported_at),
        version: Some(FORMAT_VERSION),
    }
}

impl Store {
    /// Merge an export payload into the store.
    ///
    /// # Errors
    ///
    /// `ImportFormat` when the payload carries none of the recognized
    /// collection keys, or declares a format version newer than this build
    /// understands.
    pub fn import(
        &mut self,
        file: ExportFile,
        now: DateTime<Utc>,
    ) -> Result<ImportReport, CoreError> {
        if file.recognized_collections() == 0 {
            return Err(CoreError::ImportFormat(
                "payload has none of the recognized keys \
                 (tasks, projects, categories, dailyPlans, workSchedule, journalEntries)"
                    .into(),
            ));
        }
        if let Some(version) = file.version {
            if version > FORMAT_VERSION {
                return Err(CoreError::ImportFormat(format!(
                    "payload version {version} is newer than supported version {FORMAT_VERSION}"
                )));
            }
        }

        self.undo_mut().prune(now);

        let mut report = ImportReport::default();
        let data = self.data_mut();

        if let Some(tasks) = file.tasks {
            report.tasks = upsert_by(&mut data.tasks, tasks, |t| t.id);
        }
        if let Some(projects) = file.projects {
            report.projects = upsert_by(&mut data.projects, projects, |p| p.id);
        }
        if let Some(categories) = file.categories {
            report.categories = upsert_by(&mut data.categories, categories, |c| c.id);
        }
        if let Some(plans) = file.daily_plans {
            report.daily_plans = upsert_by(&mut data.daily_plans, plans, |p| p.date);
        }
        if let Some(schedule) = file.work_schedule {
            report.shifts = upsert_by(&mut data.work_schedule.shifts, schedule.shifts, |s| s.id);
            // Keep the newer stamp so import(export()) stays lossless.
            data.work_schedule.updated_at =
                data.work_schedule.updated_at.max(schedule.updated_at);
        }
        if let Some(entries) = file.journal_entries {
            report.journal_entries = upsert_by(&mut data.journal_entries, entries, |e| e.id);
        }

        for entry in &mut data.journal_entries {
            entry.backfill_week();
        }
        report.repaired = verify::repair(data).total();
        debug_assert!(verify::verify(self.snapshot()).is_empty());

        info!(
            tasks = report.tasks,
            projects = report.projects,
            categories = report.categories,
            repaired = report.repaired,
            "import merged"
        );
        Ok(report)
    }
}

/// Merge `incoming` into `existing` by key: matching keys overwrite in
/// place, new keys append in payload order. Returns the number of incoming
/// records applied.
fn upsert_by<T, K: PartialEq>(existing: &mut Vec<T>, incoming: Vec<T>, key: fn(&T) -> K) -> usize {
    let mut applied = 0;
    for record in incoming {
        let record_key = key(&record);
        if let Some(slot) = existing.iter_mut().find(|e| key(e) == record_key) {
            *slot = record;
        } else {
            existing.push(record);
        }
        applied += 1;
    }
    applied
}
