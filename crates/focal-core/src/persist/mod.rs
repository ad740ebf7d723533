//! Persistence backends.
//!
//! The store is the single owner of all in-memory state; a [`Backend`] is a
//! thin capability interface that can round-trip that state through durable
//! storage, one whole collection at a time. The backend is chosen once at
//! startup and injected — there is no runtime switching.
//!
//! Two implementations ship:
//!
//! - [`file::FileBackend`] — one JSON file per collection under a data
//!   directory, atomic tmp-then-rename writes, advisory lock held for the
//!   life of the backend.
//! - [`memory::MemoryBackend`] — ephemeral, for tests and dry runs.
//!
//! Writes are whole-collection snapshots. That granularity is the
//! serialization unit: any future background sync must keep at most one
//! in-flight save per collection to avoid interleaved partial writes.

pub mod file;
pub mod memory;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::error::ErrorCode;
use crate::store::Snapshot;
use crate::undo::DeletedTask;

/// The persisted entity collections, one durable unit each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Tasks,
    Projects,
    Categories,
    DailyPlans,
    WorkSchedule,
    JournalEntries,
}

impl Collection {
    /// Every collection, in load/save order.
    pub const ALL: [Self; 6] = [
        Self::Tasks,
        Self::Projects,
        Self::Categories,
        Self::DailyPlans,
        Self::WorkSchedule,
        Self::JournalEntries,
    ];

    /// File name used by the file backend.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Tasks => "tasks.json",
            Self::Projects => "projects.json",
            Self::Categories => "categories.json",
            Self::DailyPlans => "daily_plans.json",
            Self::WorkSchedule => "work_schedule.json",
            Self::JournalEntries => "journal_entries.json",
        }
    }
}

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("lock timed out after {waited:?} at {}", path.display())]
    LockTimeout { path: PathBuf, waited: Duration },
}

impl PersistError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } | Self::Format { .. } => ErrorCode::SaveFailed,
            Self::LockTimeout { .. } => ErrorCode::LockContention,
        }
    }
}

/// Capability interface over durable storage.
///
/// `load` reads everything; `save` writes one collection from the given
/// snapshot. The undo stack is persisted separately — it is transient
/// working state, never part of the portable export format.
pub trait Backend {
    /// Read all collections. A missing store yields an empty snapshot.
    fn load(&self) -> Result<Snapshot, PersistError>;

    /// Durably write one collection from `snapshot`.
    fn save(&mut self, collection: Collection, snapshot: &Snapshot) -> Result<(), PersistError>;

    /// Read the persisted undo stack (oldest first). Missing ⇒ empty.
    fn load_undo(&self) -> Result<Vec<DeletedTask>, PersistError>;

    /// Durably write the undo stack.
    fn save_undo(&mut self, entries: &[DeletedTask]) -> Result<(), PersistError>;
}
