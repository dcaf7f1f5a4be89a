use crate::checklist::{self, TaskProgress};
use crate::error::Result;
use crate::paths;
use crate::status::{self, TaskStatus};
use crate::task_id::{self, TaskFileName};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// TaskFileInfo / TaskStructure
// ---------------------------------------------------------------------------

/// One task file within a change, with its parsed identity and progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFileInfo {
    pub filename: String,
    pub task_id: String,
    #[serde(flatten)]
    pub identity: TaskFileName,
    pub status: TaskStatus,
    pub progress: TaskProgress,
}

/// Ordered task files of a change plus aggregate progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStructure {
    pub files: Vec<TaskFileInfo>,
    pub aggregate: TaskProgress,
    /// Directory entries matching the task pattern that could not be read.
    /// They are excluded from `files` rather than failing the scan.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub skipped: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Build the ordered task structure for a change.
///
/// A change without a `tasks/` directory yields an empty structure — that is
/// a valid state, not an error. Filenames outside the `NNN-name.md` pattern
/// are invisible to the scan. Unreadable files are skipped and counted in
/// `skipped`; a file whose status field is missing or malformed fails the
/// whole call, since status is required content.
pub fn task_structure(root: &Path, change_id: &str) -> Result<TaskStructure> {
    let tasks_dir = paths::tasks_dir(root, change_id);
    if !tasks_dir.is_dir() {
        return Ok(TaskStructure::default());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(&tasks_dir)? {
        let entry = entry?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    let mut structure = TaskStructure::default();
    for filename in task_id::sort_task_filenames(names) {
        let path = tasks_dir.join(&filename);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!("skipping unreadable task file {}: {e}", path.display());
                structure.skipped += 1;
                continue;
            }
        };

        let task_status = status::parse_status(&content)?;
        let has_parent = status::parse_parent(&content).is_some();
        let identity = TaskFileName::parse(&filename, has_parent)?;
        let progress = checklist::count_from_content(&content);

        structure.aggregate.add(progress);
        structure.files.push(TaskFileInfo {
            task_id: task_id::task_id(&filename).to_string(),
            filename,
            identity,
            status: task_status,
            progress,
        });
    }

    Ok(structure)
}

/// Aggregate checklist progress for a change.
///
/// Prefers the `tasks/` directory; when a change has no task tree at all, a
/// legacy flat `tasks.md` still contributes to the counters. The legacy file
/// never appears as a task file entry anywhere — it only feeds this
/// aggregate.
pub fn aggregate_progress(root: &Path, change_id: &str) -> Result<TaskProgress> {
    let tasks_dir = paths::tasks_dir(root, change_id);
    if tasks_dir.is_dir() {
        return Ok(task_structure(root, change_id)?.aggregate);
    }

    let legacy = paths::legacy_tasks_path(root, change_id);
    match std::fs::read_to_string(&legacy) {
        Ok(content) => Ok(checklist::count_from_content(&content)),
        Err(_) => Ok(TaskProgress::default()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_task(root: &Path, change: &str, filename: &str, content: &str) {
        let dir = paths::tasks_dir(root, change);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(filename), content).unwrap();
    }

    #[test]
    fn missing_tasks_dir_is_empty_not_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(paths::change_dir(dir.path(), "solo")).unwrap();

        let s = task_structure(dir.path(), "solo").unwrap();
        assert!(s.files.is_empty());
        assert_eq!(s.aggregate, TaskProgress::default());
    }

    #[test]
    fn files_sorted_by_sequence_with_noise_excluded() {
        let dir = TempDir::new().unwrap();
        write_task(dir.path(), "c", "002-second.md", "status: to-do\n- [ ] b\n");
        write_task(dir.path(), "c", "001-first.md", "status: done\n- [x] a\n");
        write_task(dir.path(), "c", "README.md", "not a task");
        write_task(dir.path(), "c", "notes.txt", "junk");

        let s = task_structure(dir.path(), "c").unwrap();
        let names: Vec<_> = s.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["001-first.md", "002-second.md"]);
        assert_eq!(s.aggregate, TaskProgress { total: 2, completed: 1 });
        assert_eq!(s.files[0].task_id, "001-first");
        assert_eq!(s.files[0].status, TaskStatus::Done);
    }

    #[test]
    fn per_file_progress_and_identity() {
        let dir = TempDir::new().unwrap();
        write_task(
            dir.path(),
            "add-auth",
            "001-add-auth-schema.md",
            "status: in-progress\nparent: add-auth\n\n## Steps\n- [x] draft\n- [ ] review\n",
        );

        let s = task_structure(dir.path(), "add-auth").unwrap();
        assert_eq!(s.files.len(), 1);
        let info = &s.files[0];
        assert_eq!(info.identity.parent_id.as_deref(), Some("add-auth"));
        assert_eq!(info.identity.name, "schema");
        assert_eq!(info.progress, TaskProgress { total: 2, completed: 1 });
    }

    #[test]
    fn bad_status_fails_the_scan() {
        let dir = TempDir::new().unwrap();
        write_task(dir.path(), "c", "001-ok.md", "status: to-do\n");
        write_task(dir.path(), "c", "002-bad.md", "status: wat\n");

        assert!(task_structure(dir.path(), "c").is_err());
    }

    #[test]
    fn unreadable_entry_is_skipped_and_counted() {
        let dir = TempDir::new().unwrap();
        write_task(dir.path(), "c", "001-ok.md", "status: to-do\n- [ ] a\n");
        // A directory whose name matches the task pattern cannot be read as
        // a file; the scan skips it instead of aborting.
        std::fs::create_dir_all(paths::tasks_dir(dir.path(), "c").join("002-oops.md")).unwrap();

        let s = task_structure(dir.path(), "c").unwrap();
        assert_eq!(s.files.len(), 1);
        assert_eq!(s.skipped, 1);
        assert_eq!(s.aggregate, TaskProgress { total: 1, completed: 0 });
    }

    #[test]
    fn legacy_tasks_md_feeds_aggregate_only() {
        let dir = TempDir::new().unwrap();
        let change_dir = paths::change_dir(dir.path(), "old");
        std::fs::create_dir_all(&change_dir).unwrap();
        std::fs::write(
            change_dir.join("tasks.md"),
            "## Work\n- [x] migrated\n- [ ] pending\n",
        )
        .unwrap();

        let agg = aggregate_progress(dir.path(), "old").unwrap();
        assert_eq!(agg, TaskProgress { total: 2, completed: 1 });

        // The legacy file never shows up as a task entry.
        let s = task_structure(dir.path(), "old").unwrap();
        assert!(s.files.is_empty());
    }

    #[test]
    fn tasks_dir_wins_over_legacy_file() {
        let dir = TempDir::new().unwrap();
        let change_dir = paths::change_dir(dir.path(), "both");
        std::fs::create_dir_all(&change_dir).unwrap();
        std::fs::write(change_dir.join("tasks.md"), "- [ ] legacy\n").unwrap();
        write_task(dir.path(), "both", "001-a.md", "status: to-do\n- [x] real\n");

        let agg = aggregate_progress(dir.path(), "both").unwrap();
        assert_eq!(agg, TaskProgress { total: 1, completed: 1 });
    }
}
