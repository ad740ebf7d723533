use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::io::Write;

use focal_core::Store;
use focal_core::model::{Task, slugify};

use crate::output::{OutputMode, render};
use crate::workspace::Workspace;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Include completed and archived tasks.
    #[arg(long, conflicts_with = "completed")]
    pub all: bool,

    /// Only completed tasks.
    #[arg(long)]
    pub completed: bool,

    /// Filter by project (name or slug).
    #[arg(long, value_name = "NAME")]
    pub project: Option<String>,

    /// Filter by category (name or slug).
    #[arg(long, value_name = "NAME")]
    pub category: Option<String>,

    /// Only tasks due on or before this date.
    #[arg(long, value_name = "DATE")]
    pub due_by: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRow {
    id: String,
    title: String,
    completed: bool,
    archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    priority: String,
    subtasks: usize,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    tasks: Vec<ListRow>,
}

fn keep(task: &Task, args: &ListArgs, store: &Store) -> bool {
    if args.completed {
        if !task.completed {
            return false;
        }
    } else if !args.all && (task.completed || task.archived) {
        return false;
    }

    if let Some(project) = args.project.as_deref() {
        let slug = slugify(project);
        let matches = task
            .project_id
            .and_then(|id| store.project(id))
            .is_some_and(|p| p.slug() == slug);
        if !matches {
            return false;
        }
    }
    if let Some(category) = args.category.as_deref() {
        let slug = slugify(category);
        let matches = task
            .category_ids
            .iter()
            .filter_map(|&id| store.category(id))
            .any(|c| c.slug() == slug);
        if !matches {
            return false;
        }
    }
    if let Some(due_by) = args.due_by {
        if task.due_date.is_none_or(|due| due > due_by) {
            return false;
        }
    }
    true
}

pub fn run(args: &ListArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let session = workspace.open_session()?;
    let store = session.store();

    let rows: Vec<ListRow> = store
        .tasks()
        .iter()
        .filter(|task| keep(task, args, store))
        .map(|task| ListRow {
            id: task.id.to_string(),
            title: task.title.clone(),
            completed: task.completed,
            archived: task.archived,
            due_date: task.due_date,
            priority: task.priority.to_string(),
            subtasks: task.subtask_count(),
        })
        .collect();

    render(mode, &ListOutput { tasks: rows }, |v, w| {
        if v.tasks.is_empty() {
            return writeln!(w, "No tasks match");
        }
        for row in &v.tasks {
            let mark = if row.completed { "x" } else { " " };
            let due = row
                .due_date
                .map(|d| format!("  due {d}"))
                .unwrap_or_default();
            let kids = if row.subtasks > 0 {
                format!("  [{} subtask(s)]", row.subtasks)
            } else {
                String::new()
            };
            writeln!(w, "[{mark}] {}  {}{due}{kids}", &row.id[..8], row.title)?;
        }
        Ok(())
    })
}
