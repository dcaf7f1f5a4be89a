use crate::error::{ChangeflowError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CHANGEFLOW_DIR: &str = ".changeflow";
pub const CHANGES_DIR: &str = ".changeflow/changes";
pub const ARCHIVE_DIR: &str = ".changeflow/archive";

pub const CONFIG_FILE: &str = ".changeflow/config.yaml";

pub const PROPOSAL_FILE: &str = "proposal.md";
pub const TASKS_DIR: &str = "tasks";
/// Legacy flat task list kept by older workspaces in place of a `tasks/` tree.
pub const LEGACY_TASKS_FILE: &str = "tasks.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn changeflow_dir(root: &Path) -> PathBuf {
    root.join(CHANGEFLOW_DIR)
}

pub fn changes_dir(root: &Path) -> PathBuf {
    root.join(CHANGES_DIR)
}

pub fn archive_dir(root: &Path) -> PathBuf {
    root.join(ARCHIVE_DIR)
}

pub fn change_dir(root: &Path, change_id: &str) -> PathBuf {
    changes_dir(root).join(change_id)
}

pub fn proposal_path(root: &Path, change_id: &str) -> PathBuf {
    change_dir(root, change_id).join(PROPOSAL_FILE)
}

pub fn tasks_dir(root: &Path, change_id: &str) -> PathBuf {
    change_dir(root, change_id).join(TASKS_DIR)
}

pub fn legacy_tasks_path(root: &Path, change_id: &str) -> PathBuf {
    change_dir(root, change_id).join(LEGACY_TASKS_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(ChangeflowError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
