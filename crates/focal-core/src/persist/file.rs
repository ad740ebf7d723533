//! JSON-file persistence backend.
//!
//! One file per collection under `<focal_dir>/data/`, plus `undo.json` for
//! the transient undo stack. Writes go through a temp file and an atomic
//! rename, so a crash mid-write leaves the previous version intact. An
//! advisory exclusive lock on `<focal_dir>/lock` is held for the lifetime
//! of the backend: one writer at a time, with a bounded wait before giving
//! up with a typed timeout error.

use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use super::{Backend, Collection, PersistError};
use crate::store::Snapshot;
use crate::undo::DeletedTask;

/// How long `open` waits for another process to release the lock.
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(2);

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(25);
const UNDO_FILE: &str = "undo.json";

#[derive(Debug)]
struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    fn acquire(path: &Path, timeout: Duration) -> Result<Self, PersistError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|source| PersistError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let start = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(Self {
                        file,
                        path: path.to_path_buf(),
                    });
                }
                Err(_) if start.elapsed() < timeout => thread::sleep(LOCK_RETRY_INTERVAL),
                Err(_) => {
                    return Err(PersistError::LockTimeout {
                        path: path.to_path_buf(),
                        waited: start.elapsed(),
                    });
                }
            }
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(error) = fs2::FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), %error, "failed to release lock");
        }
    }
}

/// File-backed [`Backend`] rooted at a `.focal` directory.
#[derive(Debug)]
pub struct FileBackend {
    data_dir: PathBuf,
    _lock: LockGuard,
}

impl FileBackend {
    /// Open (creating if needed) the data directory and take the exclusive
    /// lock, waiting up to [`LOCK_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// `Io` when the directory cannot be created; `LockTimeout` when
    /// another process holds the lock for the whole wait.
    pub fn open(focal_dir: &Path) -> Result<Self, PersistError> {
        Self::open_with_timeout(focal_dir, LOCK_TIMEOUT)
    }

    /// Like [`FileBackend::open`] with an explicit lock wait budget.
    ///
    /// # Errors
    ///
    /// Same as [`FileBackend::open`].
    pub fn open_with_timeout(focal_dir: &Path, timeout: Duration) -> Result<Self, PersistError> {
        let data_dir = focal_dir.join("data");
        fs::create_dir_all(&data_dir).map_err(|source| PersistError::Io {
            path: data_dir.clone(),
            source,
        })?;
        let lock = LockGuard::acquire(&focal_dir.join("lock"), timeout)?;
        Ok(Self {
            data_dir,
            _lock: lock,
        })
    }

    fn read_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, PersistError> {
        let path = self.data_dir.join(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let bytes = fs::read(&path).map_err(|source| PersistError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| PersistError::Format { path, source })
    }

    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), PersistError> {
        let path = self.data_dir.join(name);
        let tmp = self.data_dir.join(format!("{name}.tmp"));
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| PersistError::Format {
            path: path.clone(),
            source,
        })?;
        fs::write(&tmp, bytes).map_err(|source| PersistError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| PersistError::Io { path, source })
    }
}

impl Backend for FileBackend {
    fn load(&self) -> Result<Snapshot, PersistError> {
        Ok(Snapshot {
            tasks: self.read_or_default(Collection::Tasks.file_name())?,
            projects: self.read_or_default(Collection::Projects.file_name())?,
            categories: self.read_or_default(Collection::Categories.file_name())?,
            daily_plans: self.read_or_default(Collection::DailyPlans.file_name())?,
            work_schedule: self.read_or_default(Collection::WorkSchedule.file_name())?,
            journal_entries: self.read_or_default(Collection::JournalEntries.file_name())?,
        })
    }

    fn save(&mut self, collection: Collection, snapshot: &Snapshot) -> Result<(), PersistError> {
        let name = collection.file_name();
        match collection {
            Collection::Tasks => self.write_json(name, &snapshot.tasks),
            Collection::Projects => self.write_json(name, &snapshot.projects),
            Collection::Categories => self.write_json(name, &snapshot.categories),
            Collection::DailyPlans => self.write_json(name, &snapshot.daily_plans),
            Collection::WorkSchedule => self.write_json(name, &snapshot.work_schedule),
            Collection::JournalEntries => self.write_json(name, &snapshot.journal_entries),
        }
    }

    fn load_undo(&self) -> Result<Vec<DeletedTask>, PersistError> {
        self.read_or_default(UNDO_FILE)
    }

    fn save_undo(&mut self, entries: &[DeletedTask]) -> Result<(), PersistError> {
        self.write_json(UNDO_FILE, &entries)
    }
}
