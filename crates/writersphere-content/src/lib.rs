//! Markdown rendering and preview helpers for article bodies.
//!
//! Articles are stored as GitHub-flavoured markdown (`body_md`). This crate
//! turns that text into something to show: HTML for the web, plain text for
//! a terminal, or a heading/paragraph for previews.
//!
//! # Modules
//!
//! - [`markdown`]: Rendering and extraction
//!   - [`markdown::render`]: HTML and terminal rendering
//!   - [`markdown::parser`]: First heading and first paragraph
//!
//! # Example
//!
//! ```rust
//! use writersphere_content::{display_title, render_html};
//!
//! let html = render_html("# Hello\n\n~~old~~ new");
//! assert!(html.contains("<h1>Hello</h1>"));
//! assert!(html.contains("<del>old</del>"));
//!
//! assert_eq!(display_title(Some("  ")), "Untitled");
//! ```

pub mod markdown;

pub use markdown::{
    display_title, extract_first_heading, extract_first_paragraph, render_html, render_plain,
};

pub use pulldown_cmark::HeadingLevel;
