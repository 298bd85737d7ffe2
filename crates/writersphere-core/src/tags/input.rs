//! Strict tag chip editor.
//!
//! [`TagInput`] models the tag field on the category/article forms: a list
//! of committed tags plus the chunk currently being typed. Tokens are
//! committed on Enter, comma, or newline; pasting a comma/newline separated
//! list commits every token at once and yields a [`PasteReport`].

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::{looks_like_list, remove_tag, split_list};

/// Maximum rejected tokens listed individually in a paste report.
const MAX_LISTED_REJECTIONS: usize = 20;

/// Why a token was not added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectReason {
    /// Already present (ignoring case).
    Duplicate,
    /// Contains whitespace after trimming.
    Space,
    /// Empty, or only `#` characters.
    Empty,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RejectReason::Duplicate => "duplicate",
            RejectReason::Space => "contains spaces",
            RejectReason::Empty => "empty / only #",
        })
    }
}

/// A token that was not added, with the text as it was entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedTag {
    /// Raw token text.
    pub raw: String,
    /// Why it was rejected.
    pub reason: RejectReason,
}

/// Result of adding a batch of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagBatch {
    /// Tags added, normalized.
    pub added: Vec<String>,
    /// Tokens rejected.
    pub rejected: Vec<RejectedTag>,
}

/// Strip leading `#` characters.
fn strip_hashes(text: &str) -> &str {
    text.trim_start_matches('#')
}

/// Strict normalization: trim, strip leading `#`, trim; reject empties and
/// anything with inner whitespace.
pub fn normalize_strict(raw: &str) -> Result<String, RejectReason> {
    let stripped = strip_hashes(raw.trim()).trim();
    if stripped.is_empty() {
        return Err(RejectReason::Empty);
    }
    if stripped.chars().any(char::is_whitespace) {
        return Err(RejectReason::Space);
    }
    Ok(stripped.to_string())
}

/// Tag list plus the pending, uncommitted chunk.
#[derive(Debug, Clone, Default)]
pub struct TagInput {
    tags: Vec<String>,
    pending: String,
}

impl TagInput {
    /// Start from an existing tag list.
    pub fn new(tags: Vec<String>) -> Self {
        Self {
            tags,
            pending: String::new(),
        }
    }

    /// Committed tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Consume the editor, returning the committed tags.
    pub fn into_tags(self) -> Vec<String> {
        self.tags
    }

    /// Text typed but not yet committed.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Add tokens, deduplicating against existing tags and each other.
    ///
    /// Tokens whose raw text is blank are skipped without being reported.
    pub fn add_tokens<I, S>(&mut self, tokens: I) -> TagBatch
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = self.tags.iter().map(|t| t.to_lowercase()).collect();
        let mut batch = TagBatch::default();

        for token in tokens {
            let raw = token.as_ref();
            match normalize_strict(raw) {
                Err(reason) => {
                    if !raw.trim().is_empty() {
                        batch.rejected.push(RejectedTag {
                            raw: raw.to_string(),
                            reason,
                        });
                    }
                }
                Ok(tag) => {
                    if seen.insert(tag.to_lowercase()) {
                        self.tags.push(tag.clone());
                        batch.added.push(tag);
                    } else {
                        batch.rejected.push(RejectedTag {
                            raw: raw.to_string(),
                            reason: RejectReason::Duplicate,
                        });
                    }
                }
            }
        }

        batch
    }

    /// Commit the pending chunk (Enter key).
    ///
    /// The pending text is cleared only when a tag was actually added, so a
    /// rejected token stays in the field for correction.
    pub fn commit(&mut self) -> TagBatch {
        let value = self.pending.trim().to_string();
        if value.is_empty() {
            return TagBatch::default();
        }
        let batch = self.add_tokens([value]);
        if !batch.added.is_empty() {
            self.pending.clear();
        }
        batch
    }

    /// Replace the pending chunk with freshly typed text.
    ///
    /// Leading `#` is stripped live. When the text contains a comma or
    /// newline, every complete token is committed and the chunk after the
    /// last separator stays pending.
    pub fn type_text(&mut self, text: &str) -> TagBatch {
        let text = strip_hashes(text);
        if !looks_like_list(text) {
            self.pending = text.to_string();
            return TagBatch::default();
        }

        let mut parts = split_list(text);
        let tail = parts.pop().unwrap_or_default();
        let batch = if parts.is_empty() {
            TagBatch::default()
        } else {
            self.add_tokens(parts)
        };
        self.pending = strip_hashes(tail).to_string();
        batch
    }

    /// Paste text into the field.
    ///
    /// Returns `None` when the text is not a list; the caller should treat
    /// it as ordinary typing.
    pub fn paste(&mut self, text: &str) -> Option<PasteReport> {
        if !looks_like_list(text) {
            return None;
        }
        let tokens: Vec<&str> = split_list(text)
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect();
        let batch = self.add_tokens(tokens);
        self.pending.clear();
        Some(PasteReport::from(batch))
    }

    /// Backspace in an empty field removes the last tag.
    pub fn backspace(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            return None;
        }
        let last = self.tags.last()?.clone();
        remove_tag(&mut self.tags, &last);
        Some(last)
    }

    /// Remove a tag, ignoring case.
    pub fn remove(&mut self, tag: &str) -> bool {
        remove_tag(&mut self.tags, tag)
    }
}

// ============================================================================
// PasteReport
// ============================================================================

/// Outcome shown after pasting a list of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasteReport {
    /// Whether anything was added.
    pub success: bool,
    /// Tags added.
    pub added: Vec<String>,
    /// Tokens rejected.
    pub rejected: Vec<RejectedTag>,
}

impl From<TagBatch> for PasteReport {
    fn from(batch: TagBatch) -> Self {
        Self {
            success: !batch.added.is_empty(),
            added: batch.added,
            rejected: batch.rejected,
        }
    }
}

impl PasteReport {
    /// One-line summary, e.g. `Added 2 tags • Rejected 1`.
    pub fn headline(&self) -> String {
        let mut line = match self.added.len() {
            0 => "No tags added".to_string(),
            1 => "Added 1 tag".to_string(),
            n => format!("Added {n} tags"),
        };
        if !self.rejected.is_empty() {
            line.push_str(&format!(" • Rejected {}", self.rejected.len()));
        }
        line
    }

    /// `Added: #a, #b` when anything was added.
    pub fn added_line(&self) -> Option<String> {
        if self.added.is_empty() {
            return None;
        }
        let list: Vec<String> = self.added.iter().map(|t| format!("#{t}")).collect();
        Some(format!("Added: {}", list.join(", ")))
    }

    /// One line per rejected token, capped, with an overflow line.
    pub fn rejection_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .rejected
            .iter()
            .take(MAX_LISTED_REJECTIONS)
            .map(|r| {
                let quoted = serde_json::to_string(r.raw.trim())
                    .unwrap_or_else(|_| format!("\"{}\"", r.raw.trim()));
                format!("{quoted} — {}", r.reason)
            })
            .collect();
        if self.rejected.len() > MAX_LISTED_REJECTIONS {
            lines.push(format!(
                "…and {} more",
                self.rejected.len() - MAX_LISTED_REJECTIONS
            ));
        }
        lines
    }
}

impl fmt::Display for PasteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.headline())?;
        if let Some(added) = self.added_line() {
            write!(f, "\n{added}")?;
        }
        for line in self.rejection_lines() {
            write!(f, "\n  - {line}")?;
        }
        Ok(())
    }
}
