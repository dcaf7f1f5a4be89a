use crate::output::print_json;
use changeflow_core::prioritize;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    match prioritize::prioritized_change(root) {
        Some(change) => {
            if json {
                print_json(&change)?;
                return Ok(());
            }

            println!("Change:     {}", change.id);
            println!(
                "Progress:   {}/{} ({:.0}%)",
                change.progress.completed, change.progress.total, change.completion
            );
            println!("Created:    {}", change.created_at.format("%Y-%m-%d %H:%M"));
            match (&change.in_progress_task, &change.next_task) {
                (Some(task), _) => println!("Resume:     {}", task.filename),
                (None, Some(task)) => println!("Next task:  {}", task.filename),
                (None, None) => println!("Next task:  (no task files)"),
            }
        }
        None => {
            if json {
                print_json(&serde_json::Value::Null)?;
            } else {
                println!("Nothing to do — no actionable changes.");
            }
        }
    }
    Ok(())
}
