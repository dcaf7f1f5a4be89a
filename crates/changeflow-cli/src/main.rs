mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{change::ChangeSubcommand, suggest::SuggestSubcommand, task::TaskSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "changeflow",
    about = "Track proposed changes and their tasks as markdown, and find what to work on next",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from .changeflow/ or .git/)
    #[arg(long, global = true, env = "CHANGEFLOW_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a changeflow workspace in the current project
    Init,

    /// Show the highest-priority actionable change and its next task
    Next,

    /// List all changes with progress
    List,

    /// Show the task structure of one change
    Show { change_id: String },

    /// Manage changes
    Change {
        #[command(subcommand)]
        subcommand: ChangeSubcommand,
    },

    /// Inspect and transition task status
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Print completion suggestions for shells (newline-separated ids)
    Suggest {
        #[command(subcommand)]
        subcommand: SuggestSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Next => cmd::next::run(&root, cli.json),
        Commands::List => cmd::list::run(&root, cli.json),
        Commands::Show { change_id } => cmd::show::run(&root, &change_id, cli.json),
        Commands::Change { subcommand } => cmd::change::run(&root, subcommand, cli.json),
        Commands::Task { subcommand } => cmd::task::run(&root, subcommand, cli.json),
        Commands::Suggest { subcommand } => cmd::suggest::run(&root, subcommand),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
