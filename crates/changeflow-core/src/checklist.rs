use crate::markdown;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TaskProgress
// ---------------------------------------------------------------------------

/// Checklist completion counters for one task file or a whole change.
///
/// `total == 0` means "no checklist items" and is distinct from 100%
/// complete — an empty task is not a finished one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProgress {
    pub total: usize,
    pub completed: usize,
}

impl TaskProgress {
    pub fn add(&mut self, other: TaskProgress) {
        self.total += other.total;
        self.completed += other.completed;
    }

    /// Completion percentage, 0 when there are no items.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

// ---------------------------------------------------------------------------
// Checklist line syntax
// ---------------------------------------------------------------------------

/// Section headers whose checkboxes are declarative criteria, not work items.
/// They are excluded from progress counting and never auto-toggled.
pub const EXCLUDED_SECTIONS: [&str; 2] = ["constraints", "acceptance criteria"];

pub fn is_excluded_section(header: &str) -> bool {
    let header = header.trim().to_lowercase();
    EXCLUDED_SECTIONS.iter().any(|s| *s == header)
}

/// A single parsed checklist line: `- [ ] text` or `* [x] text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistItem<'a> {
    pub checked: bool,
    pub text: &'a str,
}

/// Parse a checklist line. Bullets may be `-` or `*`, the checkbox `[ ]` or
/// `[x]`/`[X]`, leading indent is allowed.
pub fn checklist_item(line: &str) -> Option<ChecklistItem<'_>> {
    let trimmed = line.trim_start();
    let rest = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))?;

    let checked = if rest.starts_with("[ ]") {
        false
    } else if rest.starts_with("[x]") || rest.starts_with("[X]") {
        true
    } else {
        return None;
    };

    Some(ChecklistItem {
        checked,
        text: rest[3..].trim(),
    })
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Count checklist items in a task body, skipping items under the excluded
/// sections. Exclusion is a single-level toggle: entering `## Constraints` or
/// `## Acceptance Criteria` suppresses counting, any other level-2 header
/// re-enables it.
pub fn count_from_content(content: &str) -> TaskProgress {
    let mut progress = TaskProgress::default();
    let mut excluded = false;

    for line in content.lines() {
        if let Some(header) = markdown::header_name(line) {
            excluded = is_excluded_section(header);
            continue;
        }
        if excluded {
            continue;
        }
        if let Some(item) = checklist_item(line) {
            progress.total += 1;
            if item.checked {
                progress.completed += 1;
            }
        }
    }

    progress
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_checked_and_unchecked() {
        let body = "## Steps\n- [ ] one\n- [x] two\n* [X] three\n";
        let p = count_from_content(body);
        assert_eq!(p, TaskProgress { total: 3, completed: 2 });
    }

    #[test]
    fn ignores_non_checklist_lines() {
        let body = "- plain bullet\n* [y] bogus\n-[ ] no space\ntext\n";
        assert_eq!(count_from_content(body), TaskProgress::default());
    }

    #[test]
    fn excluded_sections_are_not_counted() {
        let body = "## Constraints\n- [ ] x\n## Steps\n- [ ] y";
        let p = count_from_content(body);
        assert_eq!(p, TaskProgress { total: 1, completed: 0 });
    }

    #[test]
    fn acceptance_criteria_excluded_case_insensitive() {
        let body = "## ACCEPTANCE CRITERIA\n- [x] criterion\n## Work\n- [x] item\n";
        let p = count_from_content(body);
        assert_eq!(p, TaskProgress { total: 1, completed: 1 });
    }

    #[test]
    fn other_header_exits_exclusion() {
        let body = "- [ ] before\n## Constraints\n- [ ] skipped\n## Anything\n- [x] after\n";
        let p = count_from_content(body);
        assert_eq!(p, TaskProgress { total: 2, completed: 1 });
    }

    #[test]
    fn indented_items_count() {
        let body = "## Steps\n  - [ ] nested\n\t* [x] tabbed\n";
        assert_eq!(
            count_from_content(body),
            TaskProgress { total: 2, completed: 1 }
        );
    }

    #[test]
    fn completed_never_exceeds_total() {
        let bodies = [
            "",
            "- [x] a\n- [x] b",
            "## Constraints\n- [x] a",
            "- [ ] a\n- [x] b\n- [ ] c",
        ];
        for body in bodies {
            let p = count_from_content(body);
            assert!(p.completed <= p.total, "violated for: {body:?}");
        }
    }

    #[test]
    fn empty_progress_is_not_complete() {
        let p = TaskProgress::default();
        assert!(!p.is_complete());
        assert_eq!(p.percent(), 0.0);
    }

    #[test]
    fn percent_and_complete() {
        let p = TaskProgress { total: 4, completed: 2 };
        assert_eq!(p.percent(), 50.0);
        assert!(!p.is_complete());
        assert!(TaskProgress { total: 2, completed: 2 }.is_complete());
    }

    #[test]
    fn aggregate_add() {
        let mut sum = TaskProgress { total: 2, completed: 1 };
        sum.add(TaskProgress { total: 3, completed: 3 });
        assert_eq!(sum, TaskProgress { total: 5, completed: 4 });
    }
}
