use crate::output::{print_json, print_table, progress_cell};
use anyhow::Context;
use changeflow_core::structure;
use std::path::Path;

pub fn run(root: &Path, change_id: &str, json: bool) -> anyhow::Result<()> {
    let structure = structure::task_structure(root, change_id)
        .with_context(|| format!("failed to read tasks for change '{change_id}'"))?;

    if json {
        print_json(&structure)?;
        return Ok(());
    }

    if structure.files.is_empty() {
        println!("No task files for '{change_id}'.");
        return Ok(());
    }

    println!(
        "{}: {}/{} items complete",
        change_id, structure.aggregate.completed, structure.aggregate.total
    );
    if structure.skipped > 0 {
        println!("({} unreadable task file(s) skipped)", structure.skipped);
    }
    println!();

    let rows: Vec<Vec<String>> = structure
        .files
        .iter()
        .map(|f| {
            vec![
                f.task_id.clone(),
                f.status.to_string(),
                progress_cell(&f.progress),
            ]
        })
        .collect();
    print_table(&["TASK", "STATUS", "ITEMS"], rows);
    Ok(())
}
