//! Level-2 section extraction for task and proposal markdown.
//!
//! A section is delimited by a `## Name` header line and runs until the next
//! level-2 header or end of file. Deeper headers (`###`…) are body content and
//! never open or close a section.

/// Returns the header name if `line` is a level-2 header, i.e. `## Name`.
pub(crate) fn header_name(line: &str) -> Option<&str> {
    line.strip_prefix("## ").filter(|rest| !rest.is_empty())
}

/// Extract the first section whose header matches `name` (case-insensitive,
/// whitespace-trimmed). The returned fragment includes the header line and
/// runs up to the next level-2 header or EOF, with trailing blank lines
/// trimmed. Returns `None` when no header matches.
pub fn extract_section<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let want = name.trim().to_lowercase();

    let mut start: Option<usize> = None;
    let mut end = content.len();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.strip_suffix('\n').unwrap_or(line);
        if let Some(header) = header_name(trimmed) {
            if start.is_some() {
                end = offset;
                break;
            }
            if header.trim().to_lowercase() == want {
                start = Some(offset);
            }
        }
        offset += line.len();
    }

    start.map(|s| content[s..end].trim_end())
}

/// List all level-2 header names in document order. Duplicates are preserved
/// as separate entries.
pub fn list_sections(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(header_name)
        .map(|s| s.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
