//! `focal plan` — the daily planner.

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;

use focal_core::error::ErrorCode;
use focal_core::model::{Id, TimeBlock};
use focal_core::persist::Collection;

use crate::output::{CliError, OutputMode, render, warn_save_error};
use crate::workspace::{Workspace, resolve_task_id};

#[derive(Subcommand, Debug)]
pub enum PlanCmd {
    /// Show the plan for a date (default: today).
    Show(PlanShowArgs),
    /// Add or replace a time block.
    Block(PlanBlockArgs),
    /// Remove a time block.
    Unblock(PlanUnblockArgs),
    /// Associate a task with a time block.
    Assign(PlanAssignArgs),
}

#[derive(Args, Debug)]
pub struct PlanShowArgs {
    /// Date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct PlanBlockArgs {
    /// Block title.
    pub title: String,

    /// Start time (HH:MM).
    #[arg(long)]
    pub start: String,

    /// End time (HH:MM).
    #[arg(long)]
    pub end: String,

    /// Date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct PlanUnblockArgs {
    /// Block id (full or unique prefix within the plan).
    pub block: String,

    /// Date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct PlanAssignArgs {
    /// Block id (full or unique prefix within the plan).
    pub block: String,

    /// Task id (full or unique prefix).
    pub task: String,

    /// Date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockRow {
    id: String,
    start: NaiveTime,
    end: NaiveTime,
    title: String,
    task_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PlanOutput {
    date: NaiveDate,
    blocks: Vec<BlockRow>,
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| {
            CliError::new(
                ErrorCode::ValidationFailed,
                format!("'{raw}' is not a time (expected HH:MM)"),
            )
            .into()
        })
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

/// Resolve a block on `date`'s plan by id or unique prefix.
fn resolve_block_id(
    workspace_plan: Option<&focal_core::model::DailyPlan>,
    raw: &str,
) -> Result<Id> {
    let Some(plan) = workspace_plan else {
        return Err(CliError::new(ErrorCode::EntityNotFound, "no plan for that date").into());
    };
    let matches: Vec<Id> = plan
        .time_blocks
        .iter()
        .filter(|b| b.id.to_string().starts_with(raw.trim()))
        .map(|b| b.id)
        .collect();
    match matches.as_slice() {
        [] => {
            Err(CliError::new(ErrorCode::EntityNotFound, format!("no block matches '{raw}'")).into())
        }
        [only] => Ok(*only),
        _ => Err(CliError::new(
            ErrorCode::AmbiguousId,
            format!("'{raw}' matches {} blocks", matches.len()),
        )
        .into()),
    }
}

fn plan_output(store: &focal_core::Store, date: NaiveDate) -> PlanOutput {
    let blocks = store
        .plan_for(date)
        .map(|plan| {
            plan.time_blocks
                .iter()
                .map(|b| BlockRow {
                    id: b.id.to_string(),
                    start: b.start_time,
                    end: b.end_time,
                    title: b.title.clone(),
                    task_ids: b.task_ids.iter().map(ToString::to_string).collect(),
                })
                .collect()
        })
        .unwrap_or_default();
    PlanOutput { date, blocks }
}

fn render_plan(output: &PlanOutput, mode: OutputMode) -> Result<()> {
    render(mode, output, |v, w| {
        if v.blocks.is_empty() {
            return writeln!(w, "No plan for {}", v.date);
        }
        writeln!(w, "Plan for {}", v.date)?;
        for block in &v.blocks {
            let tasks = if block.task_ids.is_empty() {
                String::new()
            } else {
                format!("  ({} task(s))", block.task_ids.len())
            };
            writeln!(
                w,
                "{}  {}–{}  {}{tasks}",
                &block.id[..8],
                block.start.format("%H:%M"),
                block.end.format("%H:%M"),
                block.title
            )?;
        }
        Ok(())
    })
}

pub fn run(command: PlanCmd, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;
    let now = Utc::now();

    match command {
        PlanCmd::Show(args) => {
            let date = today_or(args.date);
            render_plan(&plan_output(session.store(), date), mode)
        }
        PlanCmd::Block(args) => {
            let date = today_or(args.date);
            let block = TimeBlock::new(
                parse_time(&args.start)?,
                parse_time(&args.end)?,
                args.title.as_str(),
            );
            session.store_mut().upsert_block(date, block, now)?;
            session.commit(&[Collection::DailyPlans]);
            warn_save_error(&mut session);
            render_plan(&plan_output(session.store(), date), mode)
        }
        PlanCmd::Unblock(args) => {
            let date = today_or(args.date);
            let block_id = resolve_block_id(session.store().plan_for(date), &args.block)?;
            session.store_mut().remove_block(date, block_id, now)?;
            session.commit(&[Collection::DailyPlans]);
            warn_save_error(&mut session);
            render_plan(&plan_output(session.store(), date), mode)
        }
        PlanCmd::Assign(args) => {
            let date = today_or(args.date);
            let block_id = resolve_block_id(session.store().plan_for(date), &args.block)?;
            let task_id = resolve_task_id(session.store(), &args.task)?;
            session
                .store_mut()
                .link_task_to_block(date, block_id, task_id, now)?;
            session.commit(&[Collection::DailyPlans]);
            warn_save_error(&mut session);
            render_plan(&plan_output(session.store(), date), mode)
        }
    }
}
