use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::io::Write;

use focal_core::error::ErrorCode;
use focal_core::model::slugify;
use focal_core::persist::Collection;

use crate::output::{CliError, OutputMode, render, warn_save_error};
use crate::workspace::Workspace;

#[derive(Subcommand, Debug)]
pub enum ProjectCmd {
    /// Create a project.
    Add(ProjectAddArgs),
    /// List projects.
    List,
    /// Delete a project; referencing tasks keep running without it.
    Delete(ProjectDeleteArgs),
}

#[derive(Args, Debug)]
pub struct ProjectAddArgs {
    /// Project name (quick capture matches its slug, e.g. "Deep Work" ⇒
    /// #deep-work).
    pub name: String,

    /// Display color, e.g. "#aa5500".
    #[arg(long, default_value = "")]
    pub color: String,

    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct ProjectDeleteArgs {
    /// Project name or slug.
    pub name: String,
}

#[derive(Debug, Serialize)]
struct ProjectRow {
    id: String,
    name: String,
    slug: String,
    color: String,
}

pub fn run(command: ProjectCmd, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;
    let now = Utc::now();

    match command {
        ProjectCmd::Add(args) => {
            let project = session.store_mut().create_project(
                &args.name,
                &args.color,
                &args.description,
                now,
            )?;
            session.commit(&[Collection::Projects]);
            warn_save_error(&mut session);

            let row = ProjectRow {
                id: project.id.to_string(),
                slug: project.slug(),
                name: project.name,
                color: project.color,
            };
            render(mode, &row, |v, w| {
                writeln!(w, "Created project {} (capture with #{})", v.name, v.slug)
            })
        }
        ProjectCmd::List => {
            let rows: Vec<ProjectRow> = session
                .store()
                .projects()
                .iter()
                .map(|p| ProjectRow {
                    id: p.id.to_string(),
                    name: p.name.clone(),
                    slug: p.slug(),
                    color: p.color.clone(),
                })
                .collect();
            render(mode, &rows, |v, w| {
                if v.is_empty() {
                    return writeln!(w, "No projects yet");
                }
                for row in v {
                    writeln!(w, "{}  {}  #{}", &row.id[..8], row.name, row.slug)?;
                }
                Ok(())
            })
        }
        ProjectCmd::Delete(args) => {
            let slug = slugify(&args.name);
            let Some(project) = session.store().project_by_slug(&slug) else {
                return Err(CliError::new(
                    ErrorCode::EntityNotFound,
                    format!("no project '{}'", args.name),
                )
                .into());
            };
            let id = project.id;
            let name = project.name.clone();
            session.store_mut().delete_project(id, now)?;
            session.commit(&[Collection::Projects, Collection::Tasks]);
            warn_save_error(&mut session);

            #[derive(Serialize)]
            struct Deleted {
                id: String,
                name: String,
            }
            render(
                mode,
                &Deleted {
                    id: id.to_string(),
                    name,
                },
                |v, w| writeln!(w, "Deleted project {}; tasks were unlinked", v.name),
            )
        }
    }
}
