#![forbid(unsafe_code)]

mod cmd;
mod output;
mod workspace;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "focal: a local-first personal task manager",
    long_about = None
)]
struct Cli {
    /// Output format (default: pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for --format json).
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Lifecycle",
        about = "Initialize a focal workspace",
        after_help = "EXAMPLES:\n    # Initialize a workspace in the current directory\n    focal init"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Create a task",
        after_help = "EXAMPLES:\n    # Create a task\n    focal add \"Call doctor\" --due 2026-08-10 --priority high\n\n    # Create a subtask\n    focal add \"Book room\" --parent <id>"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Create a task from a quick-capture line",
        after_help = "EXAMPLES:\n    # Inline tokens set the fields\n    focal capture \"Call doctor !tomorrow !high\"\n\n    # Project and category slugs resolve against existing entities\n    focal capture \"Fix gutters #home-renovation @errands\""
    )]
    Capture(cmd::capture::CaptureArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Toggle a task's completion",
        after_help = "EXAMPLES:\n    focal done <id>"
    )]
    Done(cmd::done::DoneArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Archive all completed tasks",
        after_help = "EXAMPLES:\n    focal archive"
    )]
    Archive(cmd::done::ArchiveArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Delete a task and its whole subtree",
        after_help = "EXAMPLES:\n    # Delete (undoable for a few seconds)\n    focal delete <id>"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Lifecycle",
        about = "Restore the most recently deleted task",
        after_help = "EXAMPLES:\n    focal undo"
    )]
    Undo(cmd::delete::UndoArgs),

    #[command(
        name = "move",
        next_help_heading = "Lifecycle",
        about = "Move a task under a new parent (or to the root)",
        after_help = "EXAMPLES:\n    # Reparent\n    focal move <id> --parent <parent-id>\n\n    # Detach to root\n    focal move <id> --root"
    )]
    Move(cmd::move_cmd::MoveArgs),

    #[command(
        next_help_heading = "Read",
        about = "List tasks",
        after_help = "EXAMPLES:\n    # Open tasks (default)\n    focal list\n\n    # Include completed and archived\n    focal list --all"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show one task",
        after_help = "EXAMPLES:\n    focal show <id>"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Read",
        about = "Suggest what to work on now",
        after_help = "EXAMPLES:\n    # Five minutes and a tired brain\n    focal next --time short --energy low\n\n    # Note a blocker for context\n    focal next --blocked-on \"waiting for landlord\""
    )]
    Next(cmd::next::NextArgs),

    #[command(
        next_help_heading = "Read",
        about = "Weekly review status for the latest journaled week",
        after_help = "EXAMPLES:\n    focal review"
    )]
    Review(cmd::review::ReviewArgs),

    #[command(
        next_help_heading = "Read",
        about = "Verify store invariants",
        after_help = "EXAMPLES:\n    focal check"
    )]
    Check(cmd::check::CheckArgs),

    #[command(
        next_help_heading = "Collections",
        subcommand,
        about = "Manage projects"
    )]
    Project(cmd::project::ProjectCmd),

    #[command(
        next_help_heading = "Collections",
        subcommand,
        about = "Manage categories"
    )]
    Category(cmd::category::CategoryCmd),

    #[command(
        next_help_heading = "Planner",
        subcommand,
        about = "Manage the daily plan"
    )]
    Plan(cmd::plan::PlanCmd),

    #[command(
        next_help_heading = "Planner",
        subcommand,
        about = "Manage the work-shift calendar"
    )]
    Shift(cmd::shift::ShiftCmd),

    #[command(
        next_help_heading = "Journal",
        subcommand,
        about = "Manage journal entries"
    )]
    Journal(cmd::journal::JournalCmd),

    #[command(
        next_help_heading = "Portability",
        about = "Export all data as a single JSON document",
        after_help = "EXAMPLES:\n    # To stdout\n    focal export\n\n    # To a file\n    focal export --output backup.json"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Portability",
        about = "Import a focal export, merging by id",
        after_help = "EXAMPLES:\n    focal import backup.json"
    )]
    Import(cmd::import::ImportArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    focal completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_env("FOCAL_LOG")
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mode = resolve_output_mode(cli.format, cli.json);

    if let Err(error) = run(cli.command, mode) {
        let cli_error = error
            .downcast::<CliError>()
            .or_else(|e| e.downcast::<focal_core::CoreError>().map(CliError::from))
            .or_else(|e| {
                e.downcast::<focal_core::persist::PersistError>()
                    .map(|p| CliError::new(p.code(), p.to_string()))
            })
            .unwrap_or_else(|e| {
                CliError::new(focal_core::ErrorCode::InternalUnexpected, e.to_string())
            });
        render_error(mode, &cli_error);
        std::process::exit(1);
    }
}

fn run(command: Commands, mode: OutputMode) -> anyhow::Result<()> {
    match command {
        Commands::Init(args) => cmd::init::run(&args, mode),
        Commands::Add(args) => cmd::add::run(&args, mode),
        Commands::Capture(args) => cmd::capture::run(&args, mode),
        Commands::Done(args) => cmd::done::run_done(&args, mode),
        Commands::Archive(args) => cmd::done::run_archive(&args, mode),
        Commands::Delete(args) => cmd::delete::run_delete(&args, mode),
        Commands::Undo(args) => cmd::delete::run_undo(&args, mode),
        Commands::Move(args) => cmd::move_cmd::run(&args, mode),
        Commands::List(args) => cmd::list::run(&args, mode),
        Commands::Show(args) => cmd::show::run(&args, mode),
        Commands::Next(args) => cmd::next::run(&args, mode),
        Commands::Review(args) => cmd::review::run(&args, mode),
        Commands::Check(args) => cmd::check::run(&args, mode),
        Commands::Project(command) => cmd::project::run(command, mode),
        Commands::Category(command) => cmd::category::run(command, mode),
        Commands::Plan(command) => cmd::plan::run(command, mode),
        Commands::Shift(command) => cmd::shift::run(command, mode),
        Commands::Journal(command) => cmd::journal::run(command, mode),
        Commands::Export(args) => cmd::export::run(&args, mode),
        Commands::Import(args) => cmd::import::run(&args, mode),
        Commands::Completions(args) => cmd::completions::run::<Cli>(&args),
    }
}
