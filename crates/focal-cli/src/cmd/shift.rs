//! `focal shift` — the work-shift calendar.

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;

use focal_core::error::ErrorCode;
use focal_core::model::{Id, ShiftType};
use focal_core::persist::Collection;

use crate::output::{CliError, OutputMode, render, warn_save_error};
use crate::workspace::Workspace;

#[derive(Subcommand, Debug)]
pub enum ShiftCmd {
    /// Add a shift.
    Add(ShiftAddArgs),
    /// List shifts, optionally for one date.
    List(ShiftListArgs),
    /// Remove a shift by id.
    Remove(ShiftRemoveArgs),
}

#[derive(Args, Debug)]
pub struct ShiftAddArgs {
    /// Date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Start time (HH:MM).
    #[arg(long)]
    pub start: String,

    /// End time (HH:MM).
    #[arg(long)]
    pub end: String,

    /// Shift type: morning, day, evening, or night.
    #[arg(long = "type", default_value = "day")]
    pub shift_type: ShiftType,
}

#[derive(Args, Debug)]
pub struct ShiftListArgs {
    /// Only shifts on this date.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct ShiftRemoveArgs {
    /// Shift id (full or unique prefix).
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShiftRow {
    id: String,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    shift_type: String,
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

fn resolve_shift_id(schedule: &focal_core::model::WorkSchedule, raw: &str) -> Result<Id> {
    let matches: Vec<Id> = schedule
        .shifts
        .iter()
        .filter(|s| s.id.to_string().starts_with(raw.trim()))
        .map(|s| s.id)
        .collect();
    match matches.as_slice() {
        [] => {
            Err(CliError::new(ErrorCode::EntityNotFound, format!("no shift matches '{raw}'")).into())
        }
        [only] => Ok(*only),
        _ => Err(CliError::new(
            ErrorCode::AmbiguousId,
            format!("'{raw}' matches {} shifts", matches.len()),
        )
        .into()),
    }
}

pub fn run(command: ShiftCmd, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;
    let now = Utc::now();

    match command {
        ShiftCmd::Add(args) => {
            let date = args.date.unwrap_or_else(|| Local::now().date_naive());
            let shift = session.store_mut().add_shift(
                date,
                parse_time(&args.start)?,
                parse_time(&args.end)?,
                args.shift_type,
                now,
            )?;
            session.commit(&[Collection::WorkSchedule]);
            warn_save_error(&mut session);

            let row = ShiftRow {
                id: shift.id.to_string(),
                date: shift.date,
                start: shift.start_time,
                end: shift.end_time,
                shift_type: shift.shift_type.to_string(),
            };
            render(mode, &row, |v, w| {
                writeln!(
                    w,
                    "Added {} shift on {} ({}–{})",
                    v.shift_type,
                    v.date,
                    v.start.format("%H:%M"),
                    v.end.format("%H:%M")
                )
            })
        }
        ShiftCmd::List(args) => {
            let schedule = session.store().schedule();
            let rows: Vec<ShiftRow> = schedule
                .shifts
                .iter()
                .filter(|s| args.date.is_none_or(|d| s.date == d))
                .map(|s| ShiftRow {
                    id: s.id.to_string(),
                    date: s.date,
                    start: s.start_time,
                    end: s.end_time,
                    shift_type: s.shift_type.to_string(),
                })
                .collect();
            render(mode, &rows, |v, w| {
                if v.is_empty() {
                    return writeln!(w, "No shifts scheduled");
                }
                for row in v {
                    writeln!(
                        w,
                        "{}  {}  {}–{}  {}",
                        &row.id[..8],
                        row.date,
                        row.start.format("%H:%M"),
                        row.end.format("%H:%M"),
                        row.shift_type
                    )?;
                }
                Ok(())
            })
        }
        ShiftCmd::Remove(args) => {
            let id = resolve_shift_id(session.store().schedule(), &args.id)?;
            session.store_mut().remove_shift(id, now)?;
            session.commit(&[Collection::WorkSchedule]);
            warn_save_error(&mut session);

            #[derive(Serialize)]
            struct Removed {
                id: String,
            }
            render(mode, &Removed { id: id.to_string() }, |v, w| {
                writeln!(w, "Removed shift {}", v.id)
            })
        }
    }
}
