//! Workspace discovery and session wiring.
//!
//! A focal workspace is any directory containing a `.focal/` directory;
//! commands walk up from the current directory to find it, the same way a
//! VCS finds its repository root. The persistence backend is chosen here,
//! once, and injected into the session.

use anyhow::Result;
use std::path::{Path, PathBuf};

use focal_core::config::{ProjectConfig, load_project_config};
use focal_core::error::ErrorCode;
use focal_core::model::Id;
use focal_core::persist::file::FileBackend;
use focal_core::{Session, Store};

use crate::output::CliError;

/// Name of the workspace marker directory.
pub const FOCAL_DIR: &str = ".focal";

/// Walk up from `start` looking for a `.focal` directory.
#[must_use]
pub fn find_focal_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(FOCAL_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// A discovered workspace: its root, marker directory, and loaded config.
pub struct Workspace {
    pub root: PathBuf,
    pub focal_dir: PathBuf,
    pub config: ProjectConfig,
}

impl Workspace {
    /// Discover the workspace containing the current directory.
    ///
    /// # Errors
    ///
    /// `E1001` when no enclosing directory has a `.focal/`; config parse
    /// failures propagate.
    pub fn discover() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let Some(focal_dir) = find_focal_dir(&cwd) else {
            return Err(CliError::new(
                ErrorCode::NotInitialized,
                format!("no {FOCAL_DIR} directory found from {}", cwd.display()),
            )
            .into());
        };
        let root = focal_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| focal_dir.clone());
        let config = load_project_config(&root)?;
        Ok(Self {
            root,
            focal_dir,
            config,
        })
    }

    /// Open a session over the file backend, taking the workspace lock.
    ///
    /// # Errors
    ///
    /// Lock contention and unreadable data files propagate as persistence
    /// errors.
    pub fn open_session(&self) -> Result<Session> {
        let backend = FileBackend::open(&self.focal_dir)?;
        let session = Session::open(Box::new(backend), &self.config)?;
        Ok(session)
    }
}

/// Resolve a task from its full id or a unique id prefix.
///
/// # Errors
///
/// `E2001` when nothing matches, `E2004` when the prefix matches more than
/// one task.
pub fn resolve_task_id(store: &Store, raw: &str) -> Result<Id> {
    if let Some(task) = store.resolve_task(raw) {
        return Ok(task.id);
    }

    let needle = raw.trim();
    let matches: Vec<Id> = store
        .tasks()
        .iter()
        .filter(|t| t.id.to_string().starts_with(needle))
        .map(|t| t.id)
        .collect();

    match matches.as_slice() {
        [] => Err(CliError::new(
            ErrorCode::EntityNotFound,
            format!("no task matches '{raw}'"),
        )
        .into()),
        [only] => Ok(*only),
        _ => Err(CliError::new(
            ErrorCode::AmbiguousId,
            format!("'{raw}' matches {} tasks", matches.len()),
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use focal_core::NewTask;

    #[test]
    fn find_focal_dir_walks_up() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::create_dir_all(dir.path().join(FOCAL_DIR)).expect("mkdir marker");

        let found = find_focal_dir(&nested).expect("found");
        assert_eq!(found, dir.path().join(FOCAL_DIR));
    }

    #[test]
    fn find_focal_dir_misses_cleanly() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Guard against a .focal in an ancestor of the temp root.
        if find_focal_dir(dir.path()).is_none() {
            assert!(find_focal_dir(&dir.path().join("missing")).is_none());
        }
    }

    #[test]
    fn prefix_resolution_demands_uniqueness() {
        let mut store = Store::new();
        let a = store
            .create_task(NewTask::titled("a"), Utc::now())
            .expect("create");

        let full = a.id.to_string();
        assert_eq!(resolve_task_id(&store, &full).ok(), Some(a.id));
        assert_eq!(resolve_task_id(&store, &full[..8]).ok(), Some(a.id));
        assert!(resolve_task_id(&store, "zzzz").is_err());

        // The empty prefix matches everything — ambiguous once two exist.
        store
            .create_task(NewTask::titled("b"), Utc::now())
            .expect("create");
        assert!(resolve_task_id(&store, "").is_err());
    }
}
