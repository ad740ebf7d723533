//! `focal delete` and `focal undo`.
//!
//! Delete is a cascade: the task and its whole subtree leave the store in
//! one step, held in the undo buffer for a short window. Undo restores the
//! most recent deletion while that window is open; afterwards it reports
//! that nothing is restorable.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::io::Write;

use focal_core::persist::Collection;

use crate::output::{OutputMode, render, warn_save_error};
use crate::workspace::{Workspace, resolve_task_id};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Task id (full or unique prefix).
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteOutput {
    id: String,
    removed: usize,
    undo_window_seconds: u64,
}

pub fn run_delete(args: &DeleteArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;
    let now = Utc::now();

    let id = resolve_task_id(session.store(), &args.id)?;
    let removed = session.store_mut().delete_task(id, now)?;
    session.commit(&[Collection::Tasks, Collection::DailyPlans]);
    warn_save_error(&mut session);

    let output = DeleteOutput {
        id: id.to_string(),
        removed,
        undo_window_seconds: workspace.config.undo.window_seconds,
    };
    render(mode, &output, |v, w| {
        writeln!(
            w,
            "Deleted {} task(s); `focal undo` restores them for ~{}s",
            v.removed, v.undo_window_seconds
        )
    })
}

#[derive(Args, Debug)]
pub struct UndoArgs {}

#[derive(Debug, Serialize)]
struct UndoOutput {
    restored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

pub fn run_undo(_args: &UndoArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;

    let restored = session.store_mut().undo_delete(Utc::now());
    session.commit(&[Collection::Tasks]);
    warn_save_error(&mut session);

    let output = UndoOutput {
        restored: restored.is_some(),
        id: restored.as_ref().map(|t| t.id.to_string()),
        title: restored.as_ref().map(|t| t.title.clone()),
    };
    render(mode, &output, |v, w| {
        match (&v.id, &v.title) {
            (Some(id), Some(title)) => writeln!(w, "Restored task {id}: {title}"),
            _ => writeln!(w, "Nothing to undo (the window may have expired)"),
        }
    })
}
