//! Tag normalization.
//!
//! Two rules live side by side:
//!
//! - [`normalize_tag`] / [`unique_tags`] are the lenient rules the editor and
//!   list filters use before talking to the backend: whitespace is collapsed,
//!   never rejected.
//! - [`input::TagInput`] is the strict chip editor: tokens with inner
//!   whitespace are rejected outright and leading `#` characters are
//!   stripped.
//!
//! Both deduplicate case-insensitively and keep the casing of the first
//! occurrence.

pub mod input;

use std::collections::HashSet;

/// Normalize a tag: trim and collapse inner whitespace runs to one space.
///
/// Returns `None` when nothing is left.
///
/// # Examples
///
/// ```
/// use writersphere_core::normalize_tag;
///
/// assert_eq!(normalize_tag("  slow   burn "), Some("slow burn".to_string()));
/// assert_eq!(normalize_tag(" \t "), None);
/// ```
pub fn normalize_tag(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Normalize every tag and drop empties and case-insensitive duplicates.
///
/// Order is preserved; the first spelling of a tag wins.
///
/// # Examples
///
/// ```
/// use writersphere_core::unique_tags;
///
/// let tags = unique_tags(["Rust", " rust ", "", "Async  IO"]);
/// assert_eq!(tags, vec!["Rust", "Async IO"]);
/// ```
pub fn unique_tags<I, S>(list: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in list {
        let Some(tag) = normalize_tag(raw.as_ref()) else {
            continue;
        };
        if seen.insert(tag.to_lowercase()) {
            out.push(tag);
        }
    }
    out
}

/// Remove every tag equal to `name` ignoring case.
pub fn remove_tag(tags: &mut Vec<String>, name: &str) -> bool {
    let key = name.to_lowercase();
    let before = tags.len();
    tags.retain(|t| t.to_lowercase() != key);
    tags.len() != before
}

/// Whether `text` looks like a list of tags (contains a comma or newline).
pub fn looks_like_list(text: &str) -> bool {
    text.contains(',') || text.contains('\n')
}

/// Split on runs of commas and newlines.
///
/// Separator runs inside the text produce no empty pieces; a leading or
/// trailing separator produces an empty first or last piece, so the last
/// piece is always the unfinished chunk after the final separator.
pub fn split_list(text: &str) -> Vec<&str> {
    let pieces: Vec<&str> = text.split([',', '\n']).collect();
    let last = pieces.len().saturating_sub(1);
    pieces
        .into_iter()
        .enumerate()
        .filter(|(i, piece)| !piece.is_empty() || *i == 0 || *i == last)
        .map(|(_, piece)| piece)
        .collect()
}
