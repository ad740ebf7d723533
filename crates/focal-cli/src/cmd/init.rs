use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use focal_core::persist::file::FileBackend;

use crate::output::{OutputMode, render};
use crate::workspace::FOCAL_DIR;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory).
    #[arg(long, value_name = "PATH")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct InitOutput {
    root: PathBuf,
    created: bool,
}

pub fn run(args: &InitArgs, mode: OutputMode) -> Result<()> {
    let root = match args.path.as_ref() {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let focal_dir = root.join(FOCAL_DIR);
    let created = !focal_dir.is_dir();

    std::fs::create_dir_all(&focal_dir)?;
    // Creating the backend lays down the data directory and the lock file.
    drop(FileBackend::open(&focal_dir)?);

    let output = InitOutput { root, created };
    render(mode, &output, |v, w| {
        if v.created {
            writeln!(w, "Initialized focal workspace in {}", v.root.display())
        } else {
            writeln!(w, "Workspace already initialized in {}", v.root.display())
        }
    })
}
