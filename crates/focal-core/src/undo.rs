//! Short-lived undo buffer for deleted tasks.
//!
//! `delete_task` is a cascade: the root and its whole subtree leave the
//! store in one logical transaction. The buffer holds one snapshot per
//! deletion (root plus descendants) for a short window so the deletion can
//! be reversed with a single step. Entries expire after the window; there is
//! no long-term trash can and no transaction log.
//!
//! Expiry is enforced cooperatively: every mutation entry point calls
//! [`UndoBuffer::prune`] with its own `now`, and [`UndoBuffer::pop`] checks
//! the window again before handing a snapshot back. Pruning and undo
//! therefore run on the same single-threaded queue and cannot race.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Task;

/// Default retention window for deleted-task snapshots.
pub const DEFAULT_UNDO_WINDOW_SECONDS: u64 = 5;

/// A deletion snapshot: the deleted root task first, followed by its
/// descendants in deletion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTask {
    pub tasks: Vec<Task>,
    pub deleted_at: DateTime<Utc>,
}

impl DeletedTask {
    /// The root of the deleted subtree (the task the user asked to delete).
    #[must_use]
    pub fn root(&self) -> Option<&Task> {
        self.tasks.first()
    }
}

/// LIFO stack of deletion snapshots with time-based expiry.
#[derive(Debug, Clone)]
pub struct UndoBuffer {
    stack: Vec<DeletedTask>,
    window: Duration,
}

impl Default for UndoBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_WINDOW_SECONDS)
    }
}

impl UndoBuffer {
    #[must_use]
    pub fn new(window_seconds: u64) -> Self {
        Self {
            stack: Vec::new(),
            window: Duration::seconds(i64::try_from(window_seconds).unwrap_or(i64::MAX)),
        }
    }

    /// Rebuild a buffer from persisted entries (expired ones are dropped on
    /// the first `prune`).
    #[must_use]
    pub fn from_entries(entries: Vec<DeletedTask>, window_seconds: u64) -> Self {
        let mut buffer = Self::new(window_seconds);
        buffer.stack = entries;
        buffer
    }

    /// Record a deletion snapshot.
    pub fn push(&mut self, tasks: Vec<Task>, deleted_at: DateTime<Utc>) {
        self.stack.push(DeletedTask { tasks, deleted_at });
    }

    /// Evict every snapshot older than the window. Returns the number
    /// evicted.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let window = self.window;
        let before = self.stack.len();
        self.stack
            .retain(|entry| now.signed_duration_since(entry.deleted_at) <= window);
        let evicted = before - self.stack.len();
        if evicted > 0 {
            tracing::debug!(evicted, "undo buffer pruned");
        }
        evicted
    }

    /// Pop the most recent snapshot, but only if it is still within the
    /// window. Expired or absent snapshots yield `None` (undo is a no-op).
    pub fn pop(&mut self, now: DateTime<Utc>) -> Option<DeletedTask> {
        self.prune(now);
        self.stack.pop()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Current entries, oldest first. Used by persistence.
    #[must_use]
    pub fn entries(&self) -> &[DeletedTask] {
        &self.stack
    }
}
