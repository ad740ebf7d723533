//! In-memory persistence backend for tests and dry runs. Nothing survives
//! the process; the [`Backend`] contract is otherwise identical to the
//! file backend.

use std::io;

use super::{Backend, Collection, PersistError};
use crate::store::Snapshot;
use crate::undo::DeletedTask;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    snapshot: Snapshot,
    undo: Vec<DeletedTask>,
    poisoned: bool,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-seeded data.
    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    /// Make every subsequent save fail. Lets tests exercise the optimistic
    /// save path without a real disk fault.
    pub fn poison(&mut self) {
        self.poisoned = true;
    }

    fn check_poison(&self) -> Result<(), PersistError> {
        if self.poisoned {
            return Err(PersistError::Io {
                path: "<memory>".into(),
                source: io::Error::other("backend poisoned"),
            });
        }
        Ok(())
    }
}

impl Backend for MemoryBackend {
    fn load(&self) -> Result<Snapshot, PersistError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, collection: Collection, snapshot: &Snapshot) -> Result<(), PersistError> {
        self.check_poison()?;
        match collection {
            Collection::Tasks => self.snapshot.tasks = snapshot.tasks.clone(),
            Collection::Projects => self.snapshot.projects = snapshot.projects.clone(),
            Collection::Categories => self.snapshot.categories = snapshot.categories.clone(),
            Collection::DailyPlans => self.snapshot.daily_plans = snapshot.daily_plans.clone(),
            Collection::WorkSchedule => {
                self.snapshot.work_schedule = snapshot.work_schedule.clone();
            }
            Collection::JournalEntries => {
                self.snapshot.journal_entries = snapshot.journal_entries.clone();
            }
        }
        Ok(())
    }

    fn load_undo(&self) -> Result<Vec<DeletedTask>, PersistError> {
        Ok(self.undo.clone())
    }

    fn save_undo(&mut self, entries: &[DeletedTask]) -> Result<(), PersistError> {
        self.check_poison()?;
        self.undo = entries.to_vec();
        Ok(())
    }
}
