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
pub enum CategoryCmd {
    /// Create a category.
    Add(CategoryAddArgs),
    /// List categories.
    List,
    /// Delete a category; it is filtered off every task first.
    Delete(CategoryDeleteArgs),
}

#[derive(Args, Debug)]
pub struct CategoryAddArgs {
    /// Category name (quick capture matches its slug, e.g. "Home Life" ⇒
    /// @home-life).
    pub name: String,

    /// Display color, e.g. "#00aa55".
    #[arg(long, default_value = "")]
    pub color: String,
}

#[derive(Args, Debug)]
pub struct CategoryDeleteArgs {
    /// Category name or slug.
    pub name: String,
}

#[derive(Debug, Serialize)]
struct CategoryRow {
    id: String,
    name: String,
    slug: String,
    color: String,
}

pub fn run(command: CategoryCmd, mode: OutputMode) -> Result<()> {
    let workspace = Workspace::discover()?;
    let mut session = workspace.open_session()?;
    let now = Utc::now();

    match command {
        CategoryCmd::Add(args) => {
            let category = session
                .store_mut()
                .create_category(&args.name, &args.color, now)?;
            session.commit(&[Collection::Categories]);
            warn_save_error(&mut session);

            let row = CategoryRow {
                id: category.id.to_string(),
                slug: category.slug(),
                name: category.name,
                color: category.color,
            };
            render(mode, &row, |v, w| {
                writeln!(w, "Created category {} (capture with @{})", v.name, v.slug)
            })
        }
        CategoryCmd::List => {
            let rows: Vec<CategoryRow> = session
                .store()
                .categories()
                .iter()
                .map(|c| CategoryRow {
                    id: c.id.to_string(),
                    name: c.name.clone(),
                    slug: c.slug(),
                    color: c.color.clone(),
                })
                .collect();
            render(mode, &rows, |v, w| {
                if v.is_empty() {
                    return writeln!(w, "No categories yet");
                }
                for row in v {
                    writeln!(w, "{}  {}  @{}", &row.id[..8], row.name, row.slug)?;
                }
                Ok(())
            })
        }
        CategoryCmd::Delete(args) => {
            let slug = slugify(&args.name);
            let Some(category) = session.store().category_by_slug(&slug) else {
                return Err(CliError::new(
                    ErrorCode::EntityNotFound,
                    format!("no category '{}'", args.name),
                )
                .into());
            };
            let id = category.id;
            let name = category.name.clone();
            session.store_mut().delete_category(id, now)?;
            session.commit(&[Collection::Categories, Collection::Tasks]);
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
                |v, w| writeln!(w, "Deleted category {}; tasks were unlinked", v.name),
            )
        }
    }
}
