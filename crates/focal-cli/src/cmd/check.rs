use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write;

use focal_core::error::ErrorCode;
use focal_core::verify::verify;

use crate::output::{CliError, OutputMode, render};
use crate::workspace::Workspace;

#[derive(Args, Debug)]
pub struct CheckArgs {}

#[derive(Debug, Serialize)]
struct CheckOutput {
    ok: bool,
    violations: Vec<String>,
}

pub fn run(_args: &CheckArgs, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let session = workspace.open_session()?;

    let violations: Vec<String> = verify(session.store().snapshot())
        .iter()
        .map(ToString::to_string)
        .collect();
    let output = CheckOutput {
        ok: violations.is_empty(),
        violations,
    };

    render(mode, &output, |v, w| {
        if v.ok {
            writeln!(w, "ok: all linkage invariants hold")
        } else {
            for violation in &v.violations {
                writeln!(w, "violation: {violation}")?;
            }
            Ok(())
        }
    })?;

    if output.ok {
        Ok(())
    } else {
        Err(CliError::new(
            ErrorCode::ValidationFailed,
            format!("{} linkage violation(s) found", output.violations.len()),
        )
        .into())
    }
}
