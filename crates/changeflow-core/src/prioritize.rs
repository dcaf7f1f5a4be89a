use crate::checklist::TaskProgress;
use crate::error::Result;
use crate::paths;
use crate::status::TaskStatus;
use crate::structure::{self, TaskFileInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// ---------------------------------------------------------------------------
// PrioritizedChange
// ---------------------------------------------------------------------------

/// A change ranked by the prioritizer. Computed fresh on every query and
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritizedChange {
    pub id: String,
    /// Aggregate checklist completion, 0–100.
    pub completion: f64,
    pub created_at: DateTime<Utc>,
    pub progress: TaskProgress,
    pub task_files: Vec<TaskFileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_progress_task: Option<TaskFileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_task: Option<TaskFileInfo>,
}

impl PrioritizedChange {
    /// A change is worth surfacing when a task is mid-flight or unchecked
    /// work remains. Zero checklist items with nothing in progress means
    /// nothing to do; all items checked with nothing in progress means done.
    pub fn is_actionable(&self) -> bool {
        self.in_progress_task.is_some()
            || (self.progress.total > 0 && self.progress.completed < self.progress.total)
    }
}

// ---------------------------------------------------------------------------
// Creation time
// ---------------------------------------------------------------------------

/// Creation timestamp for a change, from its proposal file. Filesystems
/// without birth-time tracking report it as unavailable or as the epoch;
/// both fall back to the modify time rather than sorting as "created at
/// epoch".
fn created_at(path: &Path) -> Result<DateTime<Utc>> {
    let meta = std::fs::metadata(path)?;
    if let Ok(created) = meta.created() {
        let ts = DateTime::<Utc>::from(created);
        if ts.timestamp() > 0 {
            return Ok(ts);
        }
    }
    Ok(DateTime::<Utc>::from(meta.modified()?))
}

// ---------------------------------------------------------------------------
// Prioritization
// ---------------------------------------------------------------------------

/// Evaluate one change. Fails when the change is malformed (no proposal
/// file, unparseable task status); the caller drops such changes from the
/// ranking instead of propagating.
pub fn evaluate_change(root: &Path, change_id: &str) -> Result<PrioritizedChange> {
    let created = created_at(&paths::proposal_path(root, change_id))?;
    let structure = structure::task_structure(root, change_id)?;
    let progress = if structure.files.is_empty() {
        structure::aggregate_progress(root, change_id)?
    } else {
        structure.aggregate
    };

    // First in-progress and first to-do task, earliest sequence wins. The
    // files are already sequence-ordered, so stop once both are found.
    let mut in_progress = None;
    let mut to_do = None;
    for info in &structure.files {
        match info.status {
            TaskStatus::InProgress if in_progress.is_none() => in_progress = Some(info.clone()),
            TaskStatus::ToDo if to_do.is_none() => to_do = Some(info.clone()),
            _ => {}
        }
        if in_progress.is_some() && to_do.is_some() {
            break;
        }
    }

    // Resume an interrupted task before starting a new one.
    let next_task = in_progress.clone().or_else(|| to_do.clone());

    Ok(PrioritizedChange {
        id: change_id.to_string(),
        completion: progress.percent(),
        created_at: created,
        progress,
        task_files: structure.files,
        in_progress_task: in_progress,
        next_task,
    })
}

/// Rank every actionable change in the workspace and return them ordered by
/// completion percentage descending (finish near-complete work first), then
/// creation time ascending (oldest first), then id for determinism.
///
/// An unreadable changes root yields an empty ranking. Changes that error
/// while being evaluated are dropped, not propagated.
pub fn prioritized_changes(root: &Path) -> Vec<PrioritizedChange> {
    let changes_dir = paths::changes_dir(root);
    let entries = match std::fs::read_dir(&changes_dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut ranked = Vec::new();
    for entry in entries.flatten() {
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let id = entry.file_name().to_string_lossy().into_owned();
        match evaluate_change(root, &id) {
            Ok(change) if change.is_actionable() => ranked.push(change),
            Ok(_) => {}
            Err(e) => debug!("dropping change '{id}': {e}"),
        }
    }

    ranked.sort_by(|a, b| {
        b.completion
            .total_cmp(&a.completion)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
    ranked
}

/// The single highest-priority actionable change, or `None` when nothing in
/// the workspace needs work.
pub fn prioritized_change(root: &Path) -> Option<PrioritizedChange> {
    prioritized_changes(root).into_iter().next()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
