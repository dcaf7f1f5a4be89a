use crate::error::{ChangeflowError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Filename pattern
// ---------------------------------------------------------------------------

static TASK_FILE_RE: OnceLock<Regex> = OnceLock::new();

fn task_file_re() -> &'static Regex {
    TASK_FILE_RE.get_or_init(|| Regex::new(r"^(\d{3})-(.+)\.md$").unwrap())
}

/// Returns true if `filename` matches the canonical task pattern
/// `NNN-<name>.md`.
pub fn is_task_filename(filename: &str) -> bool {
    task_file_re().is_match(filename)
}

// ---------------------------------------------------------------------------
// TaskFileName
// ---------------------------------------------------------------------------

/// Identity parsed from a task filename: `NNN-name.md` or
/// `NNN-parent-name.md`.
///
/// Parent ids and task names are both kebab-case, so the split point is
/// ambiguous from the filename alone. Whether a parent segment exists is
/// decided by `has_parent_hint`, which callers derive from the file's own
/// content metadata — the filename shape is never trusted for that call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFileName {
    pub sequence: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl TaskFileName {
    pub fn parse(filename: &str, has_parent_hint: bool) -> Result<Self> {
        let caps = task_file_re()
            .captures(filename)
            .ok_or_else(|| ChangeflowError::InvalidTaskFilename(filename.to_string()))?;

        // The pattern guarantees exactly three digits.
        let sequence: u32 = caps[1].parse().expect("three-digit capture");
        let remainder = &caps[2];

        if has_parent_hint {
            // Split at the last hyphen: everything before is the parent id,
            // the final segment is the task name. A remainder with no hyphen
            // has nothing to split and stays standalone.
            if let Some(idx) = remainder.rfind('-') {
                return Ok(Self {
                    sequence,
                    name: remainder[idx + 1..].to_string(),
                    parent_id: Some(remainder[..idx].to_string()),
                });
            }
        }

        Ok(Self {
            sequence,
            name: remainder.to_string(),
            parent_id: None,
        })
    }

    /// Inverse of [`parse`](Self::parse): `NNN-[parent-]name.md`.
    pub fn build(&self) -> String {
        match &self.parent_id {
            Some(parent) => format!("{:03}-{}-{}.md", self.sequence, parent, self.name),
            None => format!("{:03}-{}.md", self.sequence, self.name),
        }
    }
}

// ---------------------------------------------------------------------------
// Task ids
// ---------------------------------------------------------------------------

/// Canonical task id for a filename: the filename with a trailing `.md`
/// removed. Only that exact suffix is stripped — other dotted suffixes are
/// part of the id.
pub fn task_id(filename: &str) -> &str {
    filename.strip_suffix(".md").unwrap_or(filename)
}

/// Returns true if `id` names a task file once the optional `.md` suffix is
/// stripped, i.e. it still carries a leading `NNN-` sequence.
pub fn is_valid_task_id(id: &str) -> bool {
    is_task_filename(&format!("{}.md", task_id(id)))
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Parse the sequence prefix from a task filename, or `None` when the name
/// does not match the pattern.
pub fn sequence_of(filename: &str) -> Option<u32> {
    task_file_re()
        .captures(filename)
        .map(|caps| caps[1].parse().expect("three-digit capture"))
}

/// Filter `filenames` down to canonical task files and sort them strictly by
/// numeric sequence. Non-matching names are dropped, not errors.
pub fn sort_task_filenames(filenames: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut ordered: Vec<(u32, String)> = filenames
        .into_iter()
        .filter_map(|f| sequence_of(&f).map(|seq| (seq, f)))
        .collect();
    ordered.sort_by_key(|(seq, _)| *seq);
    ordered.into_iter().map(|(_, f)| f).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_standalone() {
        let id = TaskFileName::parse("001-write-tests.md", false).unwrap();
        assert_eq!(id.sequence, 1);
        assert_eq!(id.name, "write-tests");
        assert_eq!(id.parent_id, None);
    }

    #[test]
    fn parse_parented_splits_at_last_hyphen() {
        let id = TaskFileName::parse("002-add-auth-schema.md", true).unwrap();
        assert_eq!(id.sequence, 2);
        assert_eq!(id.parent_id.as_deref(), Some("add-auth"));
        assert_eq!(id.name, "schema");
    }

    #[test]
    fn parent_hint_without_hyphen_stays_standalone() {
        let id = TaskFileName::parse("003-cleanup.md", true).unwrap();
        assert_eq!(id.parent_id, None);
        assert_eq!(id.name, "cleanup");
    }

    #[test]
    fn multi_word_name_without_hint_is_not_split() {
        let id = TaskFileName::parse("004-update-docs-site.md", false).unwrap();
        assert_eq!(id.parent_id, None);
        assert_eq!(id.name, "update-docs-site");
    }

    #[test]
    fn parse_rejects_bad_filenames() {
        for bad in ["tasks.md", "01-short.md", "001-.md", "001-name.txt", "README.md"] {
            assert!(
                TaskFileName::parse(bad, false).is_err(),
                "expected invalid: {bad}"
            );
        }
    }

    #[test]
    fn build_round_trips() {
        for (file, hint) in [
            ("001-write-tests.md", false),
            ("042-add-auth-schema.md", true),
            ("100-x.md", false),
        ] {
            let parsed = TaskFileName::parse(file, hint).unwrap();
            assert_eq!(parsed.build(), file);
        }
    }

    #[test]
    fn build_zero_pads_sequence() {
        let id = TaskFileName {
            sequence: 7,
            name: "deploy".into(),
            parent_id: None,
        };
        assert_eq!(id.build(), "007-deploy.md");
    }

    #[test]
    fn task_id_strips_only_md_suffix() {
        assert_eq!(task_id("001-a.md"), "001-a");
        assert_eq!(task_id("001-v1.2-notes.md"), "001-v1.2-notes");
        assert_eq!(task_id("001-a.txt"), "001-a.txt");
        assert_eq!(task_id("001-a"), "001-a");
    }

    #[test]
    fn valid_task_ids() {
        assert!(is_valid_task_id("001-a"));
        assert!(is_valid_task_id("001-a.md"));
        assert!(!is_valid_task_id("a-001"));
        assert!(!is_valid_task_id("proposal"));
    }

    #[test]
    fn sorting_is_numeric_and_drops_noise() {
        let files = vec![
            "010-later.md".to_string(),
            "README.md".to_string(),
            "002-second.md".to_string(),
            ".001-hidden.swp".to_string(),
            "001-first.md".to_string(),
        ];
        assert_eq!(
            sort_task_filenames(files),
            vec!["001-first.md", "002-second.md", "010-later.md"]
        );
    }
}
