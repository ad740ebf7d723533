//! `focal next` — the "what now" suggestions.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::io::Write;

use focal_core::model::Energy;
use focal_suggest::{Context, TimeWindow, suggest_with_limit};

use crate::output::{OutputMode, render};
use crate::workspace::Workspace;

#[derive(Args, Debug)]
pub struct NextArgs {
    /// Available time: short, medium, or long.
    #[arg(long, default_value = "medium")]
    pub time: TimeWindow,

    /// Current energy: low, medium, or high.
    #[arg(long, default_value = "medium")]
    pub energy: Energy,

    /// Things currently blocking you. Echoed for context; suggestions are
    /// not filtered by them.
    #[arg(long = "blocked-on", value_name = "TEXT")]
    pub blockers: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionRow {
    id: String,
    title: String,
    subtasks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct NextOutput {
    suggestions: Vec<SuggestionRow>,
    blockers: Vec<String>,
}

pub fn run(args: &NextArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let session = workspace.open_session()?;

    let context = Context {
        available_time: args.time,
        energy_level: args.energy,
        blockers: args.blockers.clone(),
    };
    let picks = suggest_with_limit(
        session.store().tasks(),
        &context,
        workspace.config.suggest.limit,
    );

    let output = NextOutput {
        suggestions: picks
            .iter()
            .map(|task| SuggestionRow {
                id: task.id.to_string(),
                title: task.title.clone(),
                subtasks: task.subtask_count(),
                due_date: task.due_date,
            })
            .collect(),
        blockers: context.blockers,
    };
    render(mode, &output, |v, w| {
        if v.suggestions.is_empty() {
            return writeln!(w, "Nothing to suggest — add a task or loosen the filters");
        }
        for (rank, row) in v.suggestions.iter().enumerate() {
            let due = row
                .due_date
                .map(|d| format!("  due {d}"))
                .unwrap_or_default();
            writeln!(w, "{}. {}  {}{due}", rank + 1, &row.id[..8], row.title)?;
        }
        if !v.blockers.is_empty() {
            writeln!(w)?;
            writeln!(w, "Noted blockers: {}", v.blockers.join("; "))?;
        }
        Ok(())
    })
}
