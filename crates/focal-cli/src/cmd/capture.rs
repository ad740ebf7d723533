use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use serde::Serialize;
use std::io::Write;

use focal_core::capture;
use focal_core::persist::Collection;

use crate::output::{OutputMode, pretty_kv, render, warn_save_error};
use crate::workspace::Workspace;

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// The capture line, e.g. "Call doctor !tomorrow !high #health".
    pub line: String,

    /// Parse relative date tokens against this date instead of today.
    #[arg(long, value_name = "DATE", hide = true)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptureOutput {
    id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<String>,
    categories: Vec<String>,
}

pub fn run(args: &CaptureArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let draft = capture::parse(
        &args.line,
        today,
        session.store().projects(),
        session.store().categories(),
    );
    let task = session.store_mut().create_task(draft.into_new_task(), Utc::now())?;
    session.commit(&[Collection::Tasks]);
    warn_save_error(&mut session);

    let store = session.store();
    let output = CaptureOutput {
        id: task.id.to_string(),
        title: task.title.clone(),
        due_date: task.due_date,
        priority: task.priority.to_string(),
        project: task
            .project_id
            .and_then(|id| store.project(id))
            .map(|p| p.name.clone()),
        categories: task
            .category_ids
            .iter()
            .filter_map(|&id| store.category(id))
            .map(|c| c.name.clone())
            .collect(),
    };
    render(mode, &output, |v, w| {
        writeln!(w, "Captured task {}", v.id)?;
        pretty_kv(w, "title", &v.title)?;
        if let Some(due) = v.due_date {
            pretty_kv(w, "due", due.to_string())?;
        }
        pretty_kv(w, "priority", &v.priority)?;
        if let Some(project) = v.project.as_deref() {
            pretty_kv(w, "project", project)?;
        }
        if !v.categories.is_empty() {
            pretty_kv(w, "categories", v.categories.join(", "))?;
        }
        Ok(())
    })
}
