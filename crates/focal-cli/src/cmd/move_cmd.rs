use anyhow::Result;
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::io::Write;

use focal_core::persist::Collection;

use crate::output::{OutputMode, render, warn_save_error};
use crate::workspace::{Workspace, resolve_task_id};

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Task id (full or unique prefix).
    pub id: String,

    /// New parent task id (full or unique prefix).
    #[arg(long, value_name = "ID", conflicts_with = "root")]
    pub parent: Option<String>,

    /// Detach the task: make it a root task.
    #[arg(long)]
    pub root: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveOutput {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_task_id: Option<String>,
}

pub fn run(args: &MoveArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;
    let now = Utc::now();

    let id = resolve_task_id(session.store(), &args.id)?;
    let new_parent = args
        .parent
        .as_deref()
        .map(|raw| resolve_task_id(session.store(), raw))
        .transpose()?;

    session.store_mut().move_task(id, new_parent, now)?;
    session.commit(&[Collection::Tasks]);
    warn_save_error(&mut session);

    let output = MoveOutput {
        id: id.to_string(),
        parent_task_id: new_parent.map(|p| p.to_string()),
    };
    render(mode, &output, |v, w| match v.parent_task_id.as_deref() {
        Some(parent) => writeln!(w, "Moved {} under {parent}", v.id),
        None => writeln!(w, "Moved {} to the root", v.id),
    })
}
