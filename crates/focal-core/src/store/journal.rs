//! Journal entry mutations. Entries carry their ISO week attribution at
//! write time; the weekly review aggregation lives in [`crate::review`].

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use super::Store;
use crate::error::{CoreError, EntityKind};
use crate::model::{Id, JournalEntry, ReviewSection};

impl Store {
    /// Add a journal entry dated `date`. Empty content is allowed — an
    /// empty, unmarked entry simply never counts toward review
    /// completeness.
    pub fn add_entry(
        &mut self,
        date: NaiveDate,
        content: &str,
        section: Option<ReviewSection>,
        now: DateTime<Utc>,
    ) -> JournalEntry {
        self.undo_mut().prune(now);

        let mut entry = JournalEntry::new(date, content, now);
        entry.section = section;
        self.data_mut().journal_entries.push(entry.clone());
        debug!(id = %entry.id, %date, section = ?section, "journal entry added");
        entry
    }

    /// Replace the stored entry matching `updated.id`, refreshing
    /// `updated_at` and re-deriving week metadata from the (possibly
    /// changed) date.
    ///
    /// # Errors
    ///
    /// `NotFound` when no entry has that id.
    pub fn update_entry(
        &mut self,
        updated: JournalEntry,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, CoreError> {
        self.undo_mut().prune(now);

        let id = updated.id;
        let stored = self
            .data_mut()
            .journal_entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::JournalEntry, id))?;

        let created_at = stored.created_at;
        *stored = updated;
        stored.created_at = created_at;
        stored.updated_at = now;
        stored.week_number = None;
        stored.week_year = None;
        stored.backfill_week();
        Ok(stored.clone())
    }

    /// Mark an entry completed.
    ///
    /// # Errors
    ///
    /// `NotFound` when no entry has that id.
    pub fn complete_entry(&mut self, id: Id, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.undo_mut().prune(now);

        let entry = self
            .data_mut()
            .journal_entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::not_found(EntityKind::JournalEntry, id))?;
        entry.is_completed = true;
        entry.updated_at = now;
        Ok(())
    }

    /// Delete an entry.
    ///
    /// # Errors
    ///
    /// `NotFound` when no entry has that id.
    pub fn delete_entry(&mut self, id: Id, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.undo_mut().prune(now);

        let entries = &mut self.data_mut().journal_entries;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(CoreError::not_found(EntityKind::JournalEntry, id));
        }
        Ok(())
    }
}
