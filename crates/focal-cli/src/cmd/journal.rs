//! `focal journal` — weekly journal entries.

use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;

use focal_core::model::ReviewSection;
use focal_core::persist::Collection;

use crate::output::{OutputMode, render, warn_save_error};
use crate::workspace::Workspace;

#[derive(Subcommand, Debug)]
pub enum JournalCmd {
    /// Add an entry.
    Add(JournalAddArgs),
    /// List entries, newest week first.
    List(JournalListArgs),
}

#[derive(Args, Debug)]
pub struct JournalAddArgs {
    /// Entry content. Empty content is allowed but does not count toward
    /// review completeness unless --completed is set.
    pub content: String,

    /// Review section: reflect, overdue, upcoming, projects, or life-areas.
    #[arg(long)]
    pub section: Option<ReviewSection>,

    /// Mark the entry completed immediately.
    #[arg(long)]
    pub completed: bool,

    /// Entry date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct JournalListArgs {
    /// Only entries in this ISO week key (e.g. 2026-W10).
    #[arg(long, value_name = "WEEK")]
    pub week: Option<String>,
}

#[derive(Debug, Serialize)]
struct EntryRow {
    id: String,
    date: NaiveDate,
    week: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    section: Option<String>,
    completed: bool,
    content: String,
}

pub fn run(command: JournalCmd, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;

    match command {
        JournalCmd::Add(args) => {
            let date = args.date.unwrap_or_else(|| Local::now().date_naive());
            let entry =
                session
                    .store_mut()
                    .add_entry(date, &args.content, args.section, Utc::now());
            if args.completed {
                session.store_mut().complete_entry(entry.id, Utc::now())?;
            }
            session.commit(&[Collection::JournalEntries]);
            warn_save_error(&mut session);

            let stored = session
                .store()
                .journal_entry(entry.id)
                .cloned()
                .unwrap_or(entry);
            let row = EntryRow {
                id: stored.id.to_string(),
                date: stored.date,
                week: stored.week_key(),
                section: stored.section.map(|s| s.to_string()),
                completed: stored.is_completed,
                content: stored.content,
            };
            render(mode, &row, |v, w| {
                let section = v.section.as_deref().unwrap_or("(no section)");
                writeln!(w, "Journaled {} in {} [{section}]", v.id, v.week)
            })
        }
        JournalCmd::List(args) => {
            let mut rows: Vec<EntryRow> = session
                .store()
                .journal_entries()
                .iter()
                .filter(|e| args.week.as_deref().is_none_or(|week| e.week_key() == week))
                .map(|e| EntryRow {
                    id: e.id.to_string(),
                    date: e.date,
                    week: e.week_key(),
                    section: e.section.map(|s| s.to_string()),
                    completed: e.is_completed,
                    content: e.content.clone(),
                })
                .collect();
            rows.sort_by(|a, b| b.week.cmp(&a.week).then(b.date.cmp(&a.date)));

            render(mode, &rows, |v, w| {
                if v.is_empty() {
                    return writeln!(w, "No journal entries");
                }
                for row in v {
                    let mark = if row.completed { "x" } else { " " };
                    let section = row.section.as_deref().unwrap_or("-");
                    let excerpt: String = row.content.chars().take(48).collect();
                    writeln!(
                        w,
                        "[{mark}] {}  {}  {:<10}  {excerpt}",
                        row.week, row.date, section
                    )?;
                }
                Ok(())
            })
        }
    }
}
