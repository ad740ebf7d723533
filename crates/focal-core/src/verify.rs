//! Linkage verification and deterministic repair.
//!
//! [`verify`] walks a snapshot and reports every referential violation as a
//! typed finding; the mutation engine's tests assert it returns empty after
//! every operation, and the CLI exposes it as `focal check`.
//!
//! [`repair`] applies the deterministic fixes the import path relies on:
//! one-sided parent/child edges are completed or severed, dangling weak
//! references are scrubbed. Repair converges — a second pass on a repaired
//! snapshot finds nothing.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::model::Id;
use crate::store::Snapshot;

/// A single referential violation found in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A task's `parent_task_id` references a task that does not exist.
    MissingParent { task: Id, parent: Id },
    /// A task's `parent_task_id` names an existing parent whose subtasks
    /// list does not contain the task (one-sided edge, child side).
    UnlistedChild { task: Id, parent: Id },
    /// A subtasks list references a task that does not exist.
    MissingSubtask { parent: Id, child: Id },
    /// A subtasks list references an existing task whose `parent_task_id`
    /// does not point back (one-sided edge, parent side).
    DisownedSubtask { parent: Id, child: Id },
    /// A task references a project that does not exist.
    DanglingProject { task: Id, project: Id },
    /// A task references a category that does not exist.
    DanglingCategory { task: Id, category: Id },
    /// A planner block references a task that does not exist.
    DanglingBlockTask { date: NaiveDate, block: Id, task: Id },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParent { task, parent } => {
                write!(f, "task {task} names missing parent {parent}")
            }
            Self::UnlistedChild { task, parent } => {
                write!(f, "task {task} is not listed in parent {parent}'s subtasks")
            }
            Self::MissingSubtask { parent, child } => {
                write!(f, "task {parent} lists missing subtask {child}")
            }
            Self::DisownedSubtask { parent, child } => {
                write!(f, "task {child} does not name {parent} as its parent")
            }
            Self::DanglingProject { task, project } => {
                write!(f, "task {task} references missing project {project}")
            }
            Self::DanglingCategory { task, category } => {
                write!(f, "task {task} references missing category {category}")
            }
            Self::DanglingBlockTask { date, block, task } => {
                write!(f, "plan {date} block {block} references missing task {task}")
            }
        }
    }
}

/// Counts of fixes applied by [`repair`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// One-sided edges completed by adding the missing subtasks listing.
    pub relinked: usize,
    /// Parent or subtask references severed (target missing, or both sides
    /// claimed different parents).
    pub severed: usize,
    /// Dangling project/category/block references scrubbed.
    pub scrubbed: usize,
}

impl RepairReport {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.relinked + self.severed + self.scrubbed
    }
}

/// Report every referential violation in `snapshot`. Empty means the
/// snapshot satisfies all linkage invariants.
#[must_use]
pub fn verify(snapshot: &Snapshot) -> Vec<Violation> {
    let tasks: HashMap<Id, &crate::model::Task> =
        snapshot.tasks.iter().map(|t| (t.id, t)).collect();
    let projects: HashSet<Id> = snapshot.projects.iter().map(|p| p.id).collect();
    let categories: HashSet<Id> = snapshot.categories.iter().map(|c| c.id).collect();

    let mut violations = Vec::new();

    for task in &snapshot.tasks {
        if let Some(parent_id) = task.parent_task_id {
            match tasks.get(&parent_id) {
                None => violations.push(Violation::MissingParent {
                    task: task.id,
                    parent: parent_id,
                }),
                Some(parent) if !parent.subtasks.contains(&task.id) => {
                    violations.push(Violation::UnlistedChild {
                        task: task.id,
                        parent: parent_id,
                    });
                }
                Some(_) => {}
            }
        }

        for &child_id in &task.subtasks {
            match tasks.get(&child_id) {
                None => violations.push(Violation::MissingSubtask {
                    parent: task.id,
                    child: child_id,
                }),
                Some(child) if child.parent_task_id != Some(task.id) => {
                    violations.push(Violation::DisownedSubtask {
                        parent: task.id,
                        child: child_id,
                    });
                }
                Some(_) => {}
            }
        }

        if let Some(project_id) = task.project_id {
            if !projects.contains(&project_id) {
                violations.push(Violation::DanglingProject {
                    task: task.id,
                    project: project_id,
                });
            }
        }
        for &category_id in &task.category_ids {
            if !categories.contains(&category_id) {
                violations.push(Violation::DanglingCategory {
                    task: task.id,
                    category: category_id,
                });
            }
        }
    }

    for plan in &snapshot.daily_plans {
        for block in &plan.time_blocks {
            for &task_id in &block.task_ids {
                if !tasks.contains_key(&task_id) {
                    violations.push(Violation::DanglingBlockTask {
                        date: plan.date,
                        block: block.id,
                        task: task_id,
                    });
                }
            }
        }
    }

    violations
}

/// Apply deterministic fixes for every violation class.
///
/// - `MissingParent` ⇒ clear the task's `parent_task_id`.
/// - `UnlistedChild` ⇒ append the task to its parent's subtasks.
/// - `MissingSubtask` / `DisownedSubtask` ⇒ drop the stale listing (the
///   child's own `parent_task_id` is the source of truth).
/// - Dangling project/category/block references ⇒ scrub.
pub fn repair(snapshot: &mut Snapshot) -> RepairReport {
    let mut report = RepairReport::default();

    let existing: HashSet<Id> = snapshot.tasks.iter().map(|t| t.id).collect();
    let parent_of: HashMap<Id, Option<Id>> = snapshot
        .tasks
        .iter()
        .map(|t| (t.id, t.parent_task_id))
        .collect();

    for task in &mut snapshot.tasks {
        if let Some(parent_id) = task.parent_task_id {
            if !existing.contains(&parent_id) {
                task.parent_task_id = None;
                report.severed += 1;
            }
        }

        let own_id = task.id;
        let before = task.subtasks.len();
        task.subtasks
            .retain(|child| parent_of.get(child).copied().flatten() == Some(own_id));
        report.severed += before - task.subtasks.len();
    }

    // Complete the child-side edges: every task whose parent survives must
    // appear in that parent's subtasks.
    let wanted: Vec<(Id, Id)> = snapshot
        .tasks
        .iter()
        .filter_map(|t| {
            t.parent_task_id
                .filter(|p| existing.contains(p))
                .map(|p| (p, t.id))
        })
        .collect();
    for (parent_id, child_id) in wanted {
        if let Some(parent) = snapshot.tasks.iter_mut().find(|t| t.id == parent_id) {
            if !parent.subtasks.contains(&child_id) {
                parent.subtasks.push(child_id);
                report.relinked += 1;
            }
        }
    }

    let projects: HashSet<Id> = snapshot.projects.iter().map(|p| p.id).collect();
    let categories: HashSet<Id> = snapshot.categories.iter().map(|c| c.id).collect();
    for task in &mut snapshot.tasks {
        if let Some(project_id) = task.project_id {
            if !projects.contains(&project_id) {
                task.project_id = None;
                report.scrubbed += 1;
            }
        }
        let before = task.category_ids.len();
        task.category_ids.retain(|c| categories.contains(c));
        report.scrubbed += before - task.category_ids.len();
    }

    for plan in &mut snapshot.daily_plans {
        for block in &mut plan.time_blocks {
            let before = block.task_ids.len();
            block.task_ids.retain(|t| existing.contains(t));
            report.scrubbed += before - block.task_ids.len();
        }
    }

    if report.total() > 0 {
        tracing::info!(
            relinked = report.relinked,
            severed = report.severed,
            scrubbed = report.scrubbed,
            "snapshot repaired"
        );
    }
    report
}
