use crate::checklist::TaskProgress;
use crate::error::{ChangeflowError, Result};
use crate::status::TaskStatus;
use crate::task_id::{self, TaskFileName};
use crate::{io, paths, structure};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// All change ids in the workspace, sorted by name. An unreadable or absent
/// changes root yields an empty list.
pub fn list_change_ids(root: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(paths::changes_dir(root)) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut ids: Vec<String> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    ids.sort();
    ids
}

/// A change id with its aggregate progress, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub id: String,
    pub progress: TaskProgress,
}

/// Summaries for every change in the workspace. Changes that fail to
/// aggregate (bad status field) are listed with empty progress rather than
/// hiding the whole listing.
pub fn list_changes(root: &Path) -> Vec<ChangeSummary> {
    list_change_ids(root)
        .into_iter()
        .map(|id| {
            let progress = structure::aggregate_progress(root, &id).unwrap_or_default();
            ChangeSummary { id, progress }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scaffolding
// ---------------------------------------------------------------------------

const PROPOSAL_TEMPLATE: &str = "## Why\n\n(describe the motivation)\n\n## What Changes\n\n(describe the proposed work)\n";

/// Create a new change directory with a proposal stub and an empty `tasks/`
/// tree. The id must be a valid slug and must not already exist.
pub fn create_change(root: &Path, change_id: &str) -> Result<PathBuf> {
    paths::validate_slug(change_id)?;

    let dir = paths::change_dir(root, change_id);
    if dir.exists() {
        return Err(ChangeflowError::ChangeExists(change_id.to_string()));
    }

    io::ensure_dir(&paths::tasks_dir(root, change_id))?;
    io::atomic_write(
        &paths::proposal_path(root, change_id),
        PROPOSAL_TEMPLATE.as_bytes(),
    )?;
    Ok(dir)
}

/// Add a task file to a change, numbered after the highest existing
/// sequence. With `parented` the filename carries the change id as a parent
/// segment and the metadata block records it, so the identity parser can
/// split the name back apart later. Returns the new filename.
pub fn add_task(root: &Path, change_id: &str, name: &str, parented: bool) -> Result<String> {
    paths::validate_slug(name)?;
    let change_dir = paths::change_dir(root, change_id);
    if !change_dir.is_dir() {
        return Err(ChangeflowError::ChangeNotFound(change_id.to_string()));
    }

    let tasks_dir = paths::tasks_dir(root, change_id);
    io::ensure_dir(&tasks_dir)?;

    let mut next_seq = 1;
    for entry in std::fs::read_dir(&tasks_dir)?.flatten() {
        let filename = entry.file_name().to_string_lossy().into_owned();
        if let Some(seq) = task_id::sequence_of(&filename) {
            next_seq = next_seq.max(seq + 1);
        }
    }
    // Sequences are zero-padded to exactly three digits; a fourth digit
    // would produce a filename invisible to every scan.
    if next_seq > 999 {
        return Err(ChangeflowError::TaskLimitReached(change_id.to_string()));
    }

    let identity = TaskFileName {
        sequence: next_seq,
        name: name.to_string(),
        parent_id: parented.then(|| change_id.to_string()),
    };
    let filename = identity.build();

    let mut content = format!("status: {}\n", TaskStatus::ToDo);
    if parented {
        content.push_str(&format!("parent: {change_id}\n"));
    }
    content.push_str("\n## Steps\n\n- [ ] TBD\n");

    io::atomic_write(&tasks_dir.join(&filename), content.as_bytes())?;
    Ok(filename)
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

/// Move a change directory into the archive tree. The move is a single
/// rename, so a failure never leaves a half-moved change behind. Permission
/// failures surface as their own error variant.
pub fn archive_change(root: &Path, change_id: &str) -> Result<PathBuf> {
    let src = paths::change_dir(root, change_id);
    if !src.is_dir() {
        return Err(ChangeflowError::ChangeNotFound(change_id.to_string()));
    }

    let dest = paths::archive_dir(root).join(change_id);
    if dest.exists() {
        return Err(ChangeflowError::ChangeExists(change_id.to_string()));
    }

    io::ensure_dir(&paths::archive_dir(root))?;
    std::fs::rename(&src, &dest).map_err(|e| ChangeflowError::from_io(e, &src))?;
    Ok(dest)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_change_scaffolds_proposal_and_tasks() {
        let dir = TempDir::new().unwrap();
        create_change(dir.path(), "add-auth").unwrap();

        assert!(paths::proposal_path(dir.path(), "add-auth").exists());
        assert!(paths::tasks_dir(dir.path(), "add-auth").is_dir());

        let proposal = std::fs::read_to_string(paths::proposal_path(dir.path(), "add-auth")).unwrap();
        assert!(proposal.contains("## Why"));
        assert!(proposal.contains("## What Changes"));
    }

    #[test]
    fn create_change_rejects_duplicates_and_bad_slugs() {
        let dir = TempDir::new().unwrap();
        create_change(dir.path(), "add-auth").unwrap();
        assert!(matches!(
            create_change(dir.path(), "add-auth"),
            Err(ChangeflowError::ChangeExists(_))
        ));
        assert!(matches!(
            create_change(dir.path(), "Bad Slug"),
            Err(ChangeflowError::InvalidSlug(_))
        ));
    }

    #[test]
    fn add_task_numbers_sequentially() {
        let dir = TempDir::new().unwrap();
        create_change(dir.path(), "c").unwrap();

        assert_eq!(add_task(dir.path(), "c", "first", false).unwrap(), "001-first.md");
        assert_eq!(add_task(dir.path(), "c", "second", false).unwrap(), "002-second.md");

        let content = std::fs::read_to_string(
            paths::tasks_dir(dir.path(), "c").join("001-first.md"),
        )
        .unwrap();
        assert!(content.starts_with("status: to-do\n"));
    }

    #[test]
    fn add_task_parented_records_hint() {
        let dir = TempDir::new().unwrap();
        create_change(dir.path(), "add-auth").unwrap();

        let filename = add_task(dir.path(), "add-auth", "schema", true).unwrap();
        assert_eq!(filename, "001-add-auth-schema.md");

        let structure = structure::task_structure(dir.path(), "add-auth").unwrap();
        assert_eq!(structure.files[0].identity.name, "schema");
        assert_eq!(
            structure.files[0].identity.parent_id.as_deref(),
            Some("add-auth")
        );
    }

    #[test]
    fn add_task_refuses_sequence_past_999() {
        let dir = TempDir::new().unwrap();
        create_change(dir.path(), "c").unwrap();
        std::fs::write(
            paths::tasks_dir(dir.path(), "c").join("999-cap.md"),
            "status: to-do\n",
        )
        .unwrap();

        assert!(matches!(
            add_task(dir.path(), "c", "overflow", false),
            Err(ChangeflowError::TaskLimitReached(id)) if id == "c"
        ));
    }

    #[test]
    fn add_task_to_missing_change_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            add_task(dir.path(), "nope", "task", false),
            Err(ChangeflowError::ChangeNotFound(_))
        ));
    }

    #[test]
    fn list_changes_sorted_with_progress() {
        let dir = TempDir::new().unwrap();
        create_change(dir.path(), "beta").unwrap();
        create_change(dir.path(), "alpha").unwrap();
        add_task(dir.path(), "alpha", "work", false).unwrap();

        let changes = list_changes(dir.path());
        let ids: Vec<_> = changes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
        assert_eq!(changes[0].progress.total, 1);
        assert_eq!(changes[1].progress.total, 0);
    }

    #[test]
    fn list_on_uninitialized_root_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(list_change_ids(dir.path()).is_empty());
        assert!(list_changes(dir.path()).is_empty());
    }

    #[test]
    fn archive_moves_change_out_of_listing() {
        let dir = TempDir::new().unwrap();
        create_change(dir.path(), "finished").unwrap();

        let dest = archive_change(dir.path(), "finished").unwrap();
        assert!(dest.ends_with(".changeflow/archive/finished"));
        assert!(dest.join("proposal.md").exists());
        assert!(list_change_ids(dir.path()).is_empty());
    }

    #[test]
    fn archive_is_safe_to_rerun() {
        let dir = TempDir::new().unwrap();
        create_change(dir.path(), "finished").unwrap();
        archive_change(dir.path(), "finished").unwrap();

        // The change is gone from the active tree; a rerun reports that
        // instead of clobbering the archived copy.
        assert!(matches!(
            archive_change(dir.path(), "finished"),
            Err(ChangeflowError::ChangeNotFound(_))
        ));
    }
}
