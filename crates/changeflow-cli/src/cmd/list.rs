use crate::output::{print_json, print_table, progress_cell};
use changeflow_core::change;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let changes = change::list_changes(root);

    if json {
        print_json(&changes)?;
        return Ok(());
    }

    if changes.is_empty() {
        println!("No changes. Run: changeflow change create <id>");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = changes
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                progress_cell(&c.progress),
                format!("{:.0}%", c.progress.percent()),
            ]
        })
        .collect();
    print_table(&["CHANGE", "TASKS", "DONE"], rows);
    Ok(())
}
