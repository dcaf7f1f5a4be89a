use crate::checklist::{self, checklist_item};
use crate::error::{ChangeflowError, Result};
use crate::markdown;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Task lifecycle status, declared by a `status:` line at the top of every
/// task file. A missing or unrecognized value is a data-integrity error —
/// there is no silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "to-do",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ChangeflowError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "to-do" => Ok(TaskStatus::ToDo),
            "in-progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(ChangeflowError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Status field parsing
// ---------------------------------------------------------------------------

const STATUS_KEY: &str = "status:";

/// Returns the raw status value if `line` is the status metadata line.
fn status_value(line: &str) -> Option<&str> {
    line.strip_prefix(STATUS_KEY).map(str::trim)
}

/// Read the declared status from task file content. The `status:` line must
/// appear in the metadata block before the first markdown header.
pub fn parse_status(content: &str) -> Result<TaskStatus> {
    for line in content.lines() {
        if line.starts_with('#') {
            break;
        }
        if let Some(value) = status_value(line) {
            return value.parse();
        }
    }
    Err(ChangeflowError::MissingStatus)
}

/// Read the owning change id from the metadata block, if declared. This is
/// the authoritative hint that the filename encodes a parent segment; the
/// filename shape alone cannot distinguish `parent-name` from a multi-word
/// standalone name.
pub fn parse_parent(content: &str) -> Option<String> {
    for line in content.lines() {
        if line.starts_with('#') {
            break;
        }
        if let Some(value) = line.strip_prefix("parent:") {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Rewrite only the status line, preserving every other byte of `content`.
fn set_status_in_content(content: &str, status: TaskStatus) -> Result<String> {
    let mut out = String::with_capacity(content.len());
    let mut replaced = false;
    let mut in_body = false;

    for line in content.split_inclusive('\n') {
        let bare = line.strip_suffix('\n').unwrap_or(line);
        if bare.starts_with('#') {
            in_body = true;
        }
        if !replaced && !in_body && status_value(bare).is_some() {
            out.push_str(STATUS_KEY);
            out.push(' ');
            out.push_str(status.as_str());
            if line.ends_with('\n') {
                out.push('\n');
            }
            replaced = true;
        } else {
            out.push_str(line);
        }
    }

    if !replaced {
        return Err(ChangeflowError::MissingStatus);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// File operations
// ---------------------------------------------------------------------------

/// Set the status field of the task file at `path` in place.
pub fn set_task_status(path: &Path, status: TaskStatus) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let updated = set_status_in_content(&content, status)?;
    crate::io::atomic_write(path, updated.as_bytes())
}

/// Mark the task done and check every unchecked checklist item outside the
/// excluded sections. Returns the text of each item that was transitioned,
/// in document order. Calling this on an already-complete task returns an
/// empty list but still rewrites the status field.
pub fn complete_task_fully(path: &Path) -> Result<Vec<String>> {
    toggle_task_fully(path, TaskStatus::Done, true)
}

/// Inverse of [`complete_task_fully`]: set the task back to to-do and
/// uncheck every checked, non-excluded item.
pub fn undo_task_fully(path: &Path) -> Result<Vec<String>> {
    toggle_task_fully(path, TaskStatus::ToDo, false)
}

fn toggle_task_fully(path: &Path, status: TaskStatus, check: bool) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let content = set_status_in_content(&content, status)?;

    let mut out = String::with_capacity(content.len());
    let mut transitioned = Vec::new();
    let mut excluded = false;

    for line in content.split_inclusive('\n') {
        let bare = line.strip_suffix('\n').unwrap_or(line);

        if let Some(header) = markdown::header_name(bare) {
            excluded = checklist::is_excluded_section(header);
            out.push_str(line);
            continue;
        }

        // Criteria checkboxes are declarative; never auto-toggle them.
        if excluded {
            out.push_str(line);
            continue;
        }

        match checklist_item(bare) {
            Some(item) if item.checked != check => {
                out.push_str(&toggle_checkbox(bare, check));
                if line.ends_with('\n') {
                    out.push('\n');
                }
                transitioned.push(item.text.to_string());
            }
            _ => out.push_str(line),
        }
    }

    crate::io::atomic_write(path, out.as_bytes())?;
    Ok(transitioned)
}

/// Flip the checkbox of a line already known to be a checklist item,
/// preserving indentation and bullet style.
fn toggle_checkbox(line: &str, check: bool) -> String {
    let indent = line.len() - line.trim_start().len();
    // After the indent: two bytes of bullet ("- " or "* "), then "[?]".
    let box_start = indent + 2;
    let replacement = if check { "[x]" } else { "[ ]" };
    format!(
        "{}{}{}",
        &line[..box_start],
        replacement,
        &line[box_start + 3..]
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
