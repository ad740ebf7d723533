//! Task mutations: create, update, complete, archive, reparent, cascade
//! delete, and undo.
//!
//! Subtasks form a tree by construction. Every operation here leaves the
//! parent/subtask linkage bidirectional; the cascade delete additionally
//! guards against accidental cycles with a visited set, so a corrupted
//! store cannot send it into unbounded recursion.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use tracing::debug;

use super::Store;
use crate::error::{CoreError, EntityKind};
use crate::model::{Energy, Id, Priority, Task, TaskSize};

/// Caller-supplied fields for a new task. Everything unset falls back to
/// the model defaults.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<Id>,
    pub category_ids: Vec<Id>,
    pub parent_task_id: Option<Id>,
    pub priority: Priority,
    pub energy_level: Energy,
    pub size: TaskSize,
    pub estimated_minutes: Option<u32>,
}

impl NewTask {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl Store {
    /// Create a task. If `parent_task_id` is set the parent must exist; the
    /// new id is appended to the parent's subtasks and the parent's
    /// `updated_at` is bumped in the same operation.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty title or a zero time estimate;
    /// `NotFound` when the named parent does not exist (silently dropping
    /// the subtask would break the caller's id-existence precondition).
    pub fn create_task(&mut self, new: NewTask, now: DateTime<Utc>) -> Result<Task, CoreError> {
        self.undo_mut().prune(now);

        if new.title.trim().is_empty() {
            return Err(CoreError::Validation("task title must not be empty".into()));
        }
        if new.estimated_minutes == Some(0) {
            return Err(CoreError::Validation(
                "estimated minutes must be positive".into(),
            ));
        }

        if let Some(parent_id) = new.parent_task_id {
            // Link parent-side first; the parent must exist.
            let parent = self
                .task_mut(parent_id)
                .ok_or_else(|| CoreError::not_found(EntityKind::Task, parent_id))?;
            parent.updated_at = now;
        }

        let mut task = Task::new(new.title, now);
        task.description = new.description;
        task.due_date = new.due_date;
        task.project_id = new.project_id;
        task.parent_task_id = new.parent_task_id;
        task.priority = new.priority;
        task.energy_level = new.energy_level;
        task.size = new.size;
        task.estimated_minutes = new.estimated_minutes;
        for category in new.category_ids {
            task.add_category(category);
        }

        if let Some(parent_id) = new.parent_task_id {
            if let Some(parent) = self.task_mut(parent_id) {
                parent.subtasks.push(task.id);
            }
        }

        debug!(id = %task.id, parent = ?task.parent_task_id, "task created");
        self.data_mut().tasks.push(task.clone());
        Ok(task)
    }

    /// Replace the stored task matching `updated.id`, refreshing
    /// `updated_at`. Linkage fields (`parent_task_id`, `subtasks`) and
    /// `created_at` are preserved from the stored entity: linkage changes
    /// go through [`Store::move_task`] only.
    ///
    /// # Errors
    ///
    /// `NotFound` when no task has that id; `Validation` for an empty title.
    pub fn update_task(&mut self, updated: Task, now: DateTime<Utc>) -> Result<Task, CoreError> {
        self.undo_mut().prune(now);

        if updated.title.trim().is_empty() {
            return Err(CoreError::Validation("task title must not be empty".into()));
        }

        let id = updated.id;
        let stored = self
            .task_mut(id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, id))?;

        let parent_task_id = stored.parent_task_id;
        let subtasks = std::mem::take(&mut stored.subtasks);
        let created_at = stored.created_at;

        *stored = updated;
        stored.parent_task_id = parent_task_id;
        stored.subtasks = subtasks;
        stored.created_at = created_at;
        stored.updated_at = now;

        Ok(stored.clone())
    }

    /// Toggle a task's completion flag. Subtasks and parents keep their own
    /// independent completion state; nothing cascades.
    ///
    /// # Errors
    ///
    /// `NotFound` when no task has that id.
    pub fn complete_task(&mut self, id: Id, now: DateTime<Utc>) -> Result<bool, CoreError> {
        self.undo_mut().prune(now);

        let task = self
            .task_mut(id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, id))?;
        task.completed = !task.completed;
        task.updated_at = now;
        let completed = task.completed;
        debug!(id = %id, completed, "task completion toggled");
        Ok(completed)
    }

    /// Archive every completed, not-yet-archived task. Idempotent: a second
    /// call finds nothing left to archive. Returns the number archived.
    pub fn archive_completed_tasks(&mut self, now: DateTime<Utc>) -> usize {
        self.undo_mut().prune(now);

        let mut archived = 0;
        for task in &mut self.data_mut().tasks {
            if task.completed && !task.archived {
                task.archived = true;
                task.updated_at = now;
                archived += 1;
            }
        }
        if archived > 0 {
            debug!(archived, "completed tasks archived");
        }
        archived
    }

    /// Reparent a task in one logical operation: unlink from the old
    /// parent's subtasks, link into the new parent's. `new_parent = None`
    /// makes the task a root task.
    ///
    /// # Errors
    ///
    /// `NotFound` when the task or the named parent does not exist;
    /// `CycleDetected` when the proposed parent is the task itself or one
    /// of its descendants.
    pub fn move_task(
        &mut self,
        id: Id,
        new_parent: Option<Id>,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        self.undo_mut().prune(now);

        let task = self
            .task(id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, id))?;
        let old_parent = task.parent_task_id;

        if old_parent == new_parent {
            return Ok(());
        }

        if let Some(parent_id) = new_parent {
            if self.task(parent_id).is_none() {
                return Err(CoreError::not_found(EntityKind::Task, parent_id));
            }
            if parent_id == id || self.subtree_ids(id).contains(&parent_id) {
                return Err(CoreError::CycleDetected {
                    id: id.to_string(),
                    proposed_parent: parent_id.to_string(),
                });
            }
        }

        if let Some(old_id) = old_parent {
            if let Some(parent) = self.task_mut(old_id) {
                parent.subtasks.retain(|&child| child != id);
                parent.updated_at = now;
            }
        }
        if let Some(new_id) = new_parent {
            if let Some(parent) = self.task_mut(new_id) {
                parent.subtasks.push(id);
                parent.updated_at = now;
            }
        }
        if let Some(task) = self.task_mut(id) {
            task.parent_task_id = new_parent;
            task.updated_at = now;
        }

        debug!(id = %id, from = ?old_parent, to = ?new_parent, "task moved");
        Ok(())
    }

    /// Cascade-delete a task: snapshot the root and its entire subtree into
    /// the undo buffer, unlink the root from its parent, and remove every
    /// descendant. One logical transaction — either the whole subtree goes
    /// or nothing does.
    ///
    /// Returns the number of tasks removed (the root plus its descendants).
    ///
    /// # Errors
    ///
    /// `NotFound` when no task has that id, or when the task names a parent
    /// that cannot be located for unlinking (deleting anyway would leave the
    /// store corrupt, so the whole operation fails).
    pub fn delete_task(&mut self, id: Id, now: DateTime<Utc>) -> Result<usize, CoreError> {
        self.undo_mut().prune(now);

        let task = self
            .task(id)
            .ok_or_else(|| CoreError::not_found(EntityKind::Task, id))?;
        let parent_id = task.parent_task_id;

        if let Some(parent_id) = parent_id {
            if self.task(parent_id).is_none() {
                return Err(CoreError::not_found(EntityKind::Task, parent_id));
            }
        }

        let doomed = self.subtree_order(id);
        let doomed_set: HashSet<Id> = doomed.iter().copied().collect();

        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.task_mut(parent_id) {
                parent.subtasks.retain(|&child| child != id);
                parent.updated_at = now;
            }
        }

        // Extract in subtree order (root first) so undo can restore verbatim.
        let mut removed = Vec::with_capacity(doomed.len());
        for doomed_id in &doomed {
            if let Some(index) = self.data_mut().tasks.iter().position(|t| t.id == *doomed_id) {
                removed.push(self.data_mut().tasks.remove(index));
            }
        }

        // Planner blocks reference tasks weakly; scrub what just left.
        for plan in &mut self.data_mut().daily_plans {
            let mut touched = false;
            for block in &mut plan.time_blocks {
                let before = block.task_ids.len();
                block.task_ids.retain(|t| !doomed_set.contains(t));
                touched |= block.task_ids.len() != before;
            }
            if touched {
                plan.updated_at = now;
            }
        }

        let count = removed.len();
        self.undo_mut().push(removed, now);
        debug!(id = %id, count, "task subtree deleted");
        Ok(count)
    }

    /// Restore the most recently deleted subtree, if its snapshot is still
    /// within the undo window. Best-effort: tasks are re-inserted verbatim;
    /// the root is relinked into its parent's subtasks only when that parent
    /// still exists, otherwise it comes back as a root task. Expired or
    /// absent snapshots make this a no-op returning `None`.
    ///
    /// Returns the restored root task.
    pub fn undo_delete(&mut self, now: DateTime<Utc>) -> Option<Task> {
        let snapshot = self.undo_mut().pop(now)?;
        let root_id = snapshot.root()?.id;

        for task in snapshot.tasks {
            if self.task(task.id).is_none() {
                self.data_mut().tasks.push(task);
            }
        }

        let parent_id = self.task(root_id).and_then(|t| t.parent_task_id);
        if let Some(parent_id) = parent_id {
            if self.task(parent_id).is_some() {
                if let Some(parent) = self.task_mut(parent_id) {
                    if !parent.subtasks.contains(&root_id) {
                        parent.subtasks.push(root_id);
                        parent.updated_at = now;
                    }
                }
            } else if let Some(root) = self.task_mut(root_id) {
                // Parent deleted in the interim: restore as a root task.
                root.parent_task_id = None;
            }
        }

        debug!(id = %root_id, "task restored from undo buffer");
        self.task(root_id).cloned()
    }

    /// Ids of `root` and every descendant, depth-first. The visited set
    /// bounds traversal even if the stored linkage were accidentally
    /// cyclic.
    #[must_use]
    pub fn subtree_order(&self, root: Id) -> Vec<Id> {
        let mut ordered = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            ordered.push(id);
            if let Some(task) = self.task(id) {
                for &child in task.subtasks.iter().rev() {
                    stack.push(child);
                }
            }
        }
        ordered
    }

    fn subtree_ids(&self, root: Id) -> HashSet<Id> {
        self.subtree_order(root).into_iter().collect()
    }
}
