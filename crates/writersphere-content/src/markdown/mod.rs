//! Markdown rendering and extraction utilities.
//!
//! - [`render`]: GFM to HTML, and a plain-text rendering for terminals
//! - [`parser`]: Structural extraction (first heading, first paragraph)

pub mod parser;
pub mod render;

pub use parser::{extract_first_heading, extract_first_paragraph};
pub use render::{render_html, render_plain};

use pulldown_cmark::Options;

/// Title shown when an article has none.
pub const UNTITLED: &str = "Untitled";

/// The markdown dialect articles are written in.
pub(crate) fn gfm_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// The title to display: trimmed title, or "Untitled" when blank or absent.
pub fn display_title(title: Option<&str>) -> &str {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => UNTITLED,
    }
}
