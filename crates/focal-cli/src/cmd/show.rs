use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use serde::Serialize;
use std::io::Write;

use crate::output::{OutputMode, pretty_kv, pretty_rule, render};
use crate::workspace::{Workspace, resolve_task_id};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Task id (full or unique prefix).
    pub id: String,
}

#[derive(Debug, Serialize)]
struct SubtaskRow {
    id: String,
    title: String,
    completed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowOutput {
    id: String,
    title: String,
    description: String,
    completed: bool,
    archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    priority: String,
    energy_level: String,
    size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<String>,
    categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_task_id: Option<String>,
    subtasks: Vec<SubtaskRow>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub fn run(args: &ShowArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let session = workspace.open_session()?;
    let store = session.store();

    let id = resolve_task_id(store, &args.id)?;
    let task = store
        .task(id)
        .ok_or_else(|| focal_core::CoreError::not_found(focal_core::EntityKind::Task, id))?;

    let output = ShowOutput {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        completed: task.completed,
        archived: task.archived,
        due_date: task.due_date,
        priority: task.priority.to_string(),
        energy_level: task.energy_level.to_string(),
        size: task.size.to_string(),
        estimated_minutes: task.estimated_minutes,
        project: task
            .project_id
            .and_then(|pid| store.project(pid))
            .map(|p| p.name.clone()),
        categories: task
            .category_ids
            .iter()
            .filter_map(|&cid| store.category(cid))
            .map(|c| c.name.clone())
            .collect(),
        parent_task_id: task.parent_task_id.map(|p| p.to_string()),
        subtasks: task
            .subtasks
            .iter()
            .filter_map(|&sid| store.task(sid))
            .map(|sub| SubtaskRow {
                id: sub.id.to_string(),
                title: sub.title.clone(),
                completed: sub.completed,
            })
            .collect(),
        created_at: task.created_at,
        updated_at: task.updated_at,
    };

    render(mode, &output, |v, w| {
        writeln!(w, "{}", v.title)?;
        pretty_rule(w)?;
        pretty_kv(w, "id", &v.id)?;
        pretty_kv(w, "state", show_state(v.completed, v.archived))?;
        pretty_kv(w, "priority", &v.priority)?;
        pretty_kv(w, "energy", &v.energy_level)?;
        pretty_kv(w, "size", &v.size)?;
        if let Some(due) = v.due_date {
            pretty_kv(w, "due", due.to_string())?;
        }
        if let Some(minutes) = v.estimated_minutes {
            pretty_kv(w, "estimate", format!("{minutes} min"))?;
        }
        if let Some(project) = v.project.as_deref() {
            pretty_kv(w, "project", project)?;
        }
        if !v.categories.is_empty() {
            pretty_kv(w, "categories", v.categories.join(", "))?;
        }
        if let Some(parent) = v.parent_task_id.as_deref() {
            pretty_kv(w, "parent", parent)?;
        }
        if !v.description.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", v.description)?;
        }
        if !v.subtasks.is_empty() {
            writeln!(w)?;
            writeln!(w, "Subtasks:")?;
            for sub in &v.subtasks {
                let mark = if sub.completed { "x" } else { " " };
                writeln!(w, "  [{mark}] {}  {}", &sub.id[..8], sub.title)?;
            }
        }
        Ok(())
    })
}

const fn show_state(completed: bool, archived: bool) -> &'static str {
    match (completed, archived) {
        (_, true) => "archived",
        (true, false) => "done",
        (false, false) => "open",
    }
}
