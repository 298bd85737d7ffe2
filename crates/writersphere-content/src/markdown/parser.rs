//! Markdown structure extraction.
//!
//! Used for previews: the reader prints the opening paragraph with
//! `--preview`, and the editor offers the first heading as a title
//! suggestion while the title is blank.
//!
//! # Example
//!
//! ```rust
//! use writersphere_content::markdown::parser::{extract_first_heading, extract_first_paragraph};
//! use pulldown_cmark::HeadingLevel;
//!
//! let content = "# My Title\n\nThis is the first paragraph.\n\n## Section";
//!
//! let (level, title) = extract_first_heading(content).unwrap();
//! assert_eq!(level, HeadingLevel::H1);
//! assert_eq!(title, "My Title");
//!
//! let paragraph = extract_first_paragraph(content, 100).unwrap();
//! assert_eq!(paragraph, "This is the first paragraph.");
//! ```

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use super::gfm_options;

/// Extract the first heading, with inline formatting stripped.
pub fn extract_first_heading(content: &str) -> Option<(HeadingLevel, String)> {
    let mut in_heading = false;
    let mut heading_level = HeadingLevel::H1;
    let mut heading_text = String::new();

    for event in Parser::new_ext(content, gfm_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                in_heading = true;
                heading_level = level;
                heading_text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                if in_heading && !heading_text.trim().is_empty() {
                    return Some((heading_level, heading_text.trim().to_string()));
                }
                in_heading = false;
            }
            Event::Text(text) | Event::Code(text) if in_heading => {
                heading_text.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak if in_heading => {
                heading_text.push(' ');
            }
            _ => {}
        }
    }

    None
}

/// Extract the first non-empty paragraph outside headings, truncated to
/// `max_chars` characters on a word boundary with a trailing `...`.
pub fn extract_first_paragraph(content: &str, max_chars: usize) -> Option<String> {
    let mut in_paragraph = false;
    let mut in_heading = false;
    let mut paragraph_text = String::new();

    for event in Parser::new_ext(content, gfm_options()) {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => in_heading = false,

            Event::Start(Tag::Paragraph) if !in_heading => {
                in_paragraph = true;
                paragraph_text.clear();
            }
            Event::End(TagEnd::Paragraph) if in_paragraph => {
                let trimmed = paragraph_text.trim();
                if !trimmed.is_empty() {
                    return Some(truncate_text(trimmed, max_chars));
                }
                in_paragraph = false;
            }

            Event::Text(text) | Event::Code(text) if in_paragraph => {
                paragraph_text.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak if in_paragraph => {
                paragraph_text.push(' ');
            }

            _ => {}
        }
    }

    None
}

/// Truncate to at most `max_chars` characters, backing off to a word
/// boundary, and append "...".
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    let at = cut.rfind(char::is_whitespace).unwrap_or(cut.len());
    format!("{}...", cut[..at].trim_end())
}
