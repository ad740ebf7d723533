use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write;

use focal_core::review::latest_week;

use crate::output::{OutputMode, pretty_kv, render};
use crate::workspace::Workspace;

#[derive(Args, Debug)]
pub struct ReviewArgs {}

#[derive(Debug, Serialize)]
struct ReviewOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    week: Option<String>,
    complete: bool,
    covered: Vec<String>,
    missing: Vec<String>,
    entries: usize,
}

pub fn run(_args: &ReviewArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let session = workspace.open_session()?;

    let output = match latest_week(session.store().journal_entries()) {
        Some(review) => ReviewOutput {
            week: Some(review.week_key.clone()),
            complete: review.is_complete(),
            covered: review.covered.iter().map(ToString::to_string).collect(),
            missing: review.missing.iter().map(ToString::to_string).collect(),
            entries: review.entry_count,
        },
        None => ReviewOutput {
            week: None,
            complete: false,
            covered: Vec::new(),
            missing: Vec::new(),
            entries: 0,
        },
    };

    render(mode, &output, |v, w| {
        let Some(week) = v.week.as_deref() else {
            return writeln!(w, "No journal entries yet — nothing to review");
        };
        pretty_kv(w, "week", week)?;
        pretty_kv(w, "entries", v.entries.to_string())?;
        pretty_kv(
            w,
            "status",
            if v.complete { "complete" } else { "incomplete" },
        )?;
        if !v.covered.is_empty() {
            pretty_kv(w, "covered", v.covered.join(", "))?;
        }
        if !v.missing.is_empty() {
            pretty_kv(w, "missing", v.missing.join(", "))?;
        }
        Ok(())
    })
}
