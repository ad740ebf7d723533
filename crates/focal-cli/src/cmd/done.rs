use anyhow::Result;
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::io::Write;

use focal_core::persist::Collection;

use crate::output::{OutputMode, render, warn_save_error};
use crate::workspace::{Workspace, resolve_task_id};

#[derive(Args, Debug)]
pub struct DoneArgs {
    /// Task id (full or unique prefix).
    pub id: String,
}

#[derive(Debug, Serialize)]
struct DoneOutput {
    id: String,
    title: String,
    completed: bool,
}

pub fn run_done(args: &DoneArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;
    let now = Utc::now();

    let id = resolve_task_id(session.store(), &args.id)?;
    let completed = session.store_mut().complete_task(id, now)?;
    session.commit(&[Collection::Tasks]);
    warn_save_error(&mut session);

    let title = session
        .store()
        .task(id)
        .map(|t| t.title.clone())
        .unwrap_or_default();
    let output = DoneOutput {
        id: id.to_string(),
        title,
        completed,
    };
    render(mode, &output, |v, w| {
        let state = if v.completed { "done" } else { "reopened" };
        writeln!(w, "Task {} is {state}: {}", v.id, v.title)
    })
}

#[derive(Args, Debug)]
pub struct ArchiveArgs {}

#[derive(Debug, Serialize)]
struct ArchiveOutput {
    archived: usize,
}

pub fn run_archive(_args: &ArchiveArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;

    let archived = session.store_mut().archive_completed_tasks(Utc::now());
    session.commit(&[Collection::Tasks]);
    warn_save_error(&mut session);

    render(mode, &ArchiveOutput { archived }, |v, w| {
        writeln!(w, "Archived {} completed task(s)", v.archived)
    })
}
