use crate::output::print_json;
use anyhow::Context;
use changeflow_core::change;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ChangeSubcommand {
    /// Create a new change with a proposal stub and empty tasks directory
    Create { change_id: String },
    /// Add a numbered task file to a change
    AddTask {
        change_id: String,
        name: String,
        /// Encode the change id as a parent segment in the filename
        #[arg(long)]
        parented: bool,
    },
    /// Move a change into the archive tree
    Archive { change_id: String },
    /// List all changes with progress
    List,
}

pub fn run(root: &Path, subcmd: ChangeSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ChangeSubcommand::Create { change_id } => create(root, &change_id, json),
        ChangeSubcommand::AddTask {
            change_id,
            name,
            parented,
        } => add_task(root, &change_id, &name, parented, json),
        ChangeSubcommand::Archive { change_id } => archive(root, &change_id, json),
        ChangeSubcommand::List => crate::cmd::list::run(root, json),
    }
}

fn create(root: &Path, change_id: &str, json: bool) -> anyhow::Result<()> {
    let dir = change::create_change(root, change_id)
        .with_context(|| format!("failed to create change '{change_id}'"))?;

    if json {
        print_json(&serde_json::json!({ "change": change_id, "path": dir }))?;
    } else {
        println!("Created change '{change_id}' at {}", dir.display());
    }
    Ok(())
}

fn add_task(
    root: &Path,
    change_id: &str,
    name: &str,
    parented: bool,
    json: bool,
) -> anyhow::Result<()> {
    let filename = change::add_task(root, change_id, name, parented)
        .with_context(|| format!("failed to add task to '{change_id}'"))?;

    if json {
        print_json(&serde_json::json!({ "change": change_id, "filename": filename }))?;
    } else {
        println!("Added {filename}");
    }
    Ok(())
}

fn archive(root: &Path, change_id: &str, json: bool) -> anyhow::Result<()> {
    let dest = change::archive_change(root, change_id)
        .with_context(|| format!("failed to archive change '{change_id}'"))?;

    if json {
        print_json(&serde_json::json!({ "change": change_id, "archived_to": dest }))?;
    } else {
        println!("Archived '{change_id}' to {}", dest.display());
    }
    Ok(())
}
