//! Rendering article markdown for display.
//!
//! [`render_html`] is the web preview and public reader output.
//! [`render_plain`] is what the CLI prints: headings underlined, list items
//! bulleted, code blocks indented, inline formatting dropped.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd, html};

use super::gfm_options;

/// Render GFM markdown to HTML.
pub fn render_html(markdown: &str) -> String {
    log::trace!("rendering {} bytes of markdown to html", markdown.len());
    let parser = Parser::new_ext(markdown, gfm_options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Render GFM markdown as plain terminal text.
pub fn render_plain(markdown: &str) -> String {
    let mut out = String::new();
    let mut line = String::new();
    let mut heading: Option<HeadingLevel> = None;
    let mut in_code_block = false;
    let mut list_depth: usize = 0;
    let mut link_target: Option<String> = None;

    for event in Parser::new_ext(markdown, gfm_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => heading = Some(level),
            Event::End(TagEnd::Heading(_)) => {
                let text = line.trim().to_string();
                let rule = match heading.take() {
                    Some(HeadingLevel::H1) => '=',
                    _ => '-',
                };
                push_block(&mut out, &text);
                out.push_str(&rule.to_string().repeat(text.chars().count()));
                out.push('\n');
                line.clear();
            }

            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                if list_depth == 0 {
                    push_block(&mut out, line.trim());
                    line.clear();
                }
            }

            Event::Start(Tag::List(_)) => {
                flush_item(&mut out, &mut line, list_depth);
                if list_depth == 0 && !out.is_empty() && !out.ends_with("\n\n") {
                    out.push('\n');
                }
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                flush_item(&mut out, &mut line, list_depth);
                list_depth = list_depth.saturating_sub(1);
            }
            Event::Start(Tag::Item) => flush_item(&mut out, &mut line, list_depth),
            Event::End(TagEnd::Item) => flush_item(&mut out, &mut line, list_depth),
            Event::TaskListMarker(done) => line.push_str(if done { "[x] " } else { "[ ] " }),

            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                if !out.is_empty() && !out.ends_with("\n\n") {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(text) if in_code_block => {
                for code_line in text.lines() {
                    out.push_str("    ");
                    out.push_str(code_line);
                    out.push('\n');
                }
            }

            Event::Start(Tag::Link { dest_url, .. }) => link_target = Some(dest_url.to_string()),
            Event::End(TagEnd::Link) => {
                if let Some(url) = link_target.take()
                    && !url.is_empty()
                {
                    line.push_str(&format!(" ({url})"));
                }
            }

            Event::Text(text) | Event::Code(text) => line.push_str(&text),
            Event::SoftBreak => line.push(' '),
            Event::HardBreak => line.push('\n'),
            Event::Rule => push_block(&mut out, "----"),
            _ => {}
        }
    }

    if !line.trim().is_empty() {
        push_block(&mut out, line.trim());
    }

    out.trim_end().to_string()
}

/// Append a block separated from the previous one by a blank line.
fn push_block(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !out.is_empty() && !out.ends_with("\n\n") {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    out.push_str(text);
    out.push('\n');
}

fn flush_item(out: &mut String, line: &mut String, depth: usize) {
    let text = line.trim();
    if !text.is_empty() {
        let indent = "  ".repeat(depth.saturating_sub(1));
        out.push_str(&format!("{indent}- {text}\n"));
    }
    line.clear();
}
