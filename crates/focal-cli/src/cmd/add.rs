use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Args;
use serde::Serialize;
use std::io::Write;

use focal_core::error::ErrorCode;
use focal_core::model::{Energy, Id, Priority, TaskSize, slugify};
use focal_core::persist::Collection;
use focal_core::{NewTask, Store};

use crate::output::{CliError, OutputMode, pretty_kv, render, warn_save_error};
use crate::workspace::{Workspace, resolve_task_id};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task title.
    pub title: String,

    /// Longer description.
    #[arg(long, default_value = "")]
    pub description: String,

    /// Due date (YYYY-MM-DD).
    #[arg(long)]
    pub due: Option<NaiveDate>,

    /// Priority: low, medium, or high.
    #[arg(long, default_value = "medium")]
    pub priority: Priority,

    /// Energy the task demands: low, medium, or high.
    #[arg(long, default_value = "medium")]
    pub energy: Energy,

    /// Size: small, medium, or large.
    #[arg(long, default_value = "medium")]
    pub size: TaskSize,

    /// Estimated minutes to finish.
    #[arg(long, value_name = "MINUTES")]
    pub estimate: Option<u32>,

    /// Parent task id (full or unique prefix); makes this a subtask.
    #[arg(long, value_name = "ID")]
    pub parent: Option<String>,

    /// Project, by name or slug.
    #[arg(long, value_name = "NAME")]
    pub project: Option<String>,

    /// Category, by name or slug. May repeat.
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddOutput {
    id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_task_id: Option<String>,
}

/// Resolve a `--project`/`--category` argument by slug (names with spaces
/// work too — they share the slug rule).
fn resolve_project(store: &Store, raw: &str) -> Result<Id> {
    let slug = slugify(raw);
    store
        .project_by_slug(&slug)
        .map(|p| p.id)
        .ok_or_else(|| CliError::new(ErrorCode::EntityNotFound, format!("no project '{raw}'")).into())
}

fn resolve_category(store: &Store, raw: &str) -> Result<Id> {
    let slug = slugify(raw);
    store
        .category_by_slug(&slug)
        .map(|c| c.id)
        .ok_or_else(|| {
            CliError::new(ErrorCode::EntityNotFound, format!("no category '{raw}'")).into()
        })
}

pub fn run(args: &AddArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;
    let now = Utc::now();

    let parent_task_id = args
        .parent
        .as_deref()
        .map(|raw| resolve_task_id(session.store(), raw))
        .transpose()?;
    let project_id = args
        .project
        .as_deref()
        .map(|raw| resolve_project(session.store(), raw))
        .transpose()?;
    let category_ids = args
        .categories
        .iter()
        .map(|raw| resolve_category(session.store(), raw))
        .collect::<Result<Vec<_>>>()?;

    let task = session.store_mut().create_task(
        NewTask {
            title: args.title.clone(),
            description: args.description.clone(),
            due_date: args.due,
            project_id,
            category_ids,
            parent_task_id,
            priority: args.priority,
            energy_level: args.energy,
            size: args.size,
            estimated_minutes: args.estimate,
        },
        now,
    )?;
    session.commit(&[Collection::Tasks]);
    warn_save_error(&mut session);

    let output = AddOutput {
        id: task.id.to_string(),
        title: task.title.clone(),
        due_date: task.due_date,
        priority: task.priority.to_string(),
        parent_task_id: task.parent_task_id.map(|id| id.to_string()),
    };
    render(mode, &output, |v, w| {
        writeln!(w, "Created task {}", v.id)?;
        pretty_kv(w, "title", &v.title)?;
        if let Some(due) = v.due_date {
            pretty_kv(w, "due", due.to_string())?;
        }
        if let Some(parent) = v.parent_task_id.as_deref() {
            pretty_kv(w, "parent", parent)?;
        }
        Ok(())
    })
}
