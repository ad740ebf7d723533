use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use focal_core::portable;

use crate::workspace::Workspace;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output path (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ExportArgs, _mode: crate::output::OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let session = workspace.open_session()?;

    let file = portable::export(session.store(), Utc::now());

    let mut out: Box<dyn Write> = match args.output.as_ref() {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    serde_json::to_writer_pretty(&mut out, &file).context("failed to serialize export")?;
    writeln!(out)?;
    out.flush()?;

    if let Some(path) = args.output.as_ref() {
        eprintln!("Exported to {}", path.display());
    }
    Ok(())
}
