use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::PathBuf;

use focal_core::portable::{ExportFile, ImportReport};

use crate::output::{OutputMode, pretty_kv, render};
use crate::workspace::Workspace;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to a focal export; omit to read from stdin.
    pub input: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ImportOutput {
    #[serde(flatten)]
    report: ImportReport,
}

pub fn run(args: &ImportArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;

    let text = match args.input.as_ref() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let payload = ExportFile::from_json(&text)?;
    let report = session.store_mut().import(payload, Utc::now())?;

    // Durability is the point of an import: propagate save failures instead
    // of the usual optimistic warning.
    session.flush()?;

    render(mode, &ImportOutput { report }, |v, w| {
        writeln!(w, "Import complete")?;
        pretty_kv(w, "tasks", v.report.tasks.to_string())?;
        pretty_kv(w, "projects", v.report.projects.to_string())?;
        pretty_kv(w, "categories", v.report.categories.to_string())?;
        pretty_kv(w, "plans", v.report.daily_plans.to_string())?;
        pretty_kv(w, "shifts", v.report.shifts.to_string())?;
        pretty_kv(w, "journal", v.report.journal_entries.to_string())?;
        if v.report.repaired > 0 {
            pretty_kv(w, "repaired", v.report.repaired.to_string())?;
        }
        Ok(())
    })
}
