//! Text normalization and HTML flattening
//!
//! All lengths are counted in characters.

use ego_tree::iter::Edge;
use regex::Regex;
use scraper::{Html, Node};
use std::sync::LazyLock;

use crate::utils::truncate_with_marker;

static HORIZONTAL_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("BUG: hardcoded horizontal whitespace regex is invalid"));

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("BUG: hardcoded blank-run regex is invalid"));

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*•]\s+").expect("BUG: hardcoded bullet regex is invalid"));

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\s+").expect("BUG: hardcoded numbered-list regex is invalid"));

/// Elements whose text never belongs to readable content
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "svg", "canvas", "iframe", "form"];

/// Collapse horizontal whitespace and blank-line runs, trim, and truncate
///
/// ```
/// # use kodegen_tools_websearch::page_extractor::text::normalize_text;
/// assert_eq!(normalize_text("  a \t b\r\n\n\n\nc  ", 100), "a b\n\nc");
/// ```
#[must_use]
pub fn normalize_text(text: &str, max_chars: usize) -> String {
    let text = HORIZONTAL_WS.replace_all(text, " ");
    let text = text.replace("\r\n", "\n");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    truncate_with_marker(text.trim().to_string(), max_chars)
}

/// Re-flow extracted text into paragraphs
///
/// Hard-wrapped prose lines are merged with single spaces. Code-like lines
/// (four-space or tab indent, fences), list items and short heading-like lines
/// ending in `:` stay on their own. Paragraphs are separated by one blank line.
#[must_use]
pub fn clean_page_text(text: &str, max_chars: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut out: Vec<String> = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    fn flush(buffer: &mut Vec<&str>, out: &mut Vec<String>) {
        if !buffer.is_empty() {
            out.push(buffer.join(" ").trim().to_string());
            buffer.clear();
        }
    }

    for line in text.lines() {
        let line = line.trim_end();

        if line.trim().is_empty() {
            flush(&mut buffer, &mut out);
            continue;
        }

        let structural = line.starts_with("    ")
            || line.starts_with('\t')
            || line.starts_with("```")
            || BULLET_LINE.is_match(line)
            || NUMBERED_LINE.is_match(line);
        if structural {
            flush(&mut buffer, &mut out);
            out.push(line.to_string());
            continue;
        }

        if line.chars().count() < 80 && line.ends_with(':') {
            flush(&mut buffer, &mut out);
            out.push(line.trim().to_string());
            continue;
        }

        buffer.push(line.trim());
    }
    flush(&mut buffer, &mut out);

    let joined = out.join("\n\n");
    let joined = BLANK_RUNS.replace_all(&joined, "\n\n");
    truncate_with_marker(joined.trim().to_string(), max_chars)
}

/// Visible text of an HTML document or fragment, one text node per line
///
/// Script-like and form elements are dropped with their whole subtree.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();
    let mut skip_depth = 0usize;

    for edge in document.tree.root().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(el) => {
                    if skip_depth > 0 || SKIPPED_TAGS.contains(&el.name()) {
                        skip_depth += 1;
                    }
                }
                Node::Text(text) if skip_depth == 0 => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed);
                    }
                }
                _ => {}
            },
            Edge::Close(node) => {
                if node.value().is_element() && skip_depth > 0 {
                    skip_depth -= 1;
                }
            }
        }
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::TRUNCATION_MARKER;

    #[test]
    fn normalize_truncates_with_marker() {
        let out = normalize_text(&"word ".repeat(100), 20);
        assert!(out.ends_with(TRUNCATION_MARKER));
        assert_eq!(out.chars().count(), 20 + TRUNCATION_MARKER.chars().count());
    }

    #[test]
    fn clean_merges_wrapped_prose() {
        let text = "This paragraph was\nhard wrapped by\nthe site.\n\nSecond one.";
        assert_eq!(
            clean_page_text(text, 10_000),
            "This paragraph was hard wrapped by the site.\n\nSecond one."
        );
    }

    #[test]
    fn clean_keeps_structural_lines() {
        let text = "Install steps:\n- cargo add tokio\n1. build it\n    let x = 1;\n```rust\nplain prose";
        assert_eq!(
            clean_page_text(text, 10_000),
            "Install steps:\n\n- cargo add tokio\n\n1. build it\n\n    let x = 1;\n\n```rust\n\nplain prose"
        );
    }

    #[test]
    fn html_flattening_skips_scripts_and_forms() {
        let html = r#"<html><head><style>p{}</style></head><body>
            <h1>Title</h1><script>var x = 1;</script>
            <p>First <b>bold</b></p>
            <form><input value="no"><label>Search</label></form>
            <noscript>enable js</noscript><p>Last</p></body></html>"#;
        assert_eq!(html_to_text(html), "Title\nFirst\nbold\nLast");
    }
}
