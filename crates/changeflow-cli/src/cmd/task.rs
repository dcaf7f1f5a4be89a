use crate::output::print_json;
use anyhow::{bail, Context};
use changeflow_core::{paths, status, task_id};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Print a task's status
    Status { change_id: String, task: String },
    /// Mark a task in-progress
    Start { change_id: String, task: String },
    /// Mark a task done and check all of its work items
    Complete { change_id: String, task: String },
    /// Reset a task to to-do and uncheck all of its work items
    Undo { change_id: String, task: String },
}

pub fn run(root: &Path, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TaskSubcommand::Status { change_id, task } => show_status(root, &change_id, &task, json),
        TaskSubcommand::Start { change_id, task } => start(root, &change_id, &task, json),
        TaskSubcommand::Complete { change_id, task } => complete(root, &change_id, &task, json),
        TaskSubcommand::Undo { change_id, task } => undo(root, &change_id, &task, json),
    }
}

/// Accepts a task id (`001-name`) or a full filename (`001-name.md`) and
/// resolves it to a path inside the change's tasks directory.
fn resolve_task(root: &Path, change_id: &str, task: &str) -> anyhow::Result<PathBuf> {
    if !task_id::is_valid_task_id(task) {
        bail!("'{task}' is not a task id (expected NNN-name)");
    }
    let filename = format!("{}.md", task_id::task_id(task));
    let path = paths::tasks_dir(root, change_id).join(&filename);
    if !path.is_file() {
        bail!("task '{task}' not found in change '{change_id}'");
    }
    Ok(path)
}

fn show_status(root: &Path, change_id: &str, task: &str, json: bool) -> anyhow::Result<()> {
    let path = resolve_task(root, change_id, task)?;
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let task_status = status::parse_status(&content)
        .with_context(|| format!("bad status field in {}", path.display()))?;

    if json {
        print_json(&serde_json::json!({
            "change": change_id,
            "task": task_id::task_id(task),
            "status": task_status,
        }))?;
    } else {
        println!("{task_status}");
    }
    Ok(())
}

fn start(root: &Path, change_id: &str, task: &str, json: bool) -> anyhow::Result<()> {
    let path = resolve_task(root, change_id, task)?;
    status::set_task_status(&path, status::TaskStatus::InProgress)
        .with_context(|| format!("failed to update {}", path.display()))?;

    if json {
        print_json(&serde_json::json!({
            "change": change_id,
            "task": task_id::task_id(task),
            "status": status::TaskStatus::InProgress,
        }))?;
    } else {
        println!("Started {}", task_id::task_id(task));
    }
    Ok(())
}

fn complete(root: &Path, change_id: &str, task: &str, json: bool) -> anyhow::Result<()> {
    let path = resolve_task(root, change_id, task)?;
    let items = status::complete_task_fully(&path)
        .with_context(|| format!("failed to update {}", path.display()))?;

    if json {
        print_json(&serde_json::json!({
            "change": change_id,
            "task": task_id::task_id(task),
            "status": status::TaskStatus::Done,
            "checked_items": items,
        }))?;
        return Ok(());
    }

    println!("Completed {}", task_id::task_id(task));
    for item in &items {
        println!("  [x] {item}");
    }
    if items.is_empty() {
        println!("  (no items to check)");
    }
    Ok(())
}

fn undo(root: &Path, change_id: &str, task: &str, json: bool) -> anyhow::Result<()> {
    let path = resolve_task(root, change_id, task)?;
    let items = status::undo_task_fully(&path)
        .with_context(|| format!("failed to update {}", path.display()))?;

    if json {
        print_json(&serde_json::json!({
            "change": change_id,
            "task": task_id::task_id(task),
            "status": status::TaskStatus::ToDo,
            "unchecked_items": items,
        }))?;
        return Ok(());
    }

    println!("Reset {}", task_id::task_id(task));
    for item in &items {
        println!("  [ ] {item}");
    }
    Ok(())
}
