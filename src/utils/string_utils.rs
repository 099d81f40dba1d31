//! UTF-8-safe string helpers
//!
//! Every length in this crate is counted in characters, never bytes: extracted
//! text is routinely CJK and a byte-indexed cut would panic mid code point.

use super::constants::TRUNCATION_MARKER;

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// # Examples
/// ```
/// # use kodegen_tools_websearch::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("人机验证页面", 4), "人机验证");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Number of Unicode scalar values in `s`
#[inline]
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cut `text` to `max_chars` characters and append [`TRUNCATION_MARKER`].
///
/// Text already within budget is returned unchanged.
///
/// ```
/// # use kodegen_tools_websearch::utils::string_utils::truncate_with_marker;
/// assert_eq!(truncate_with_marker("short".to_string(), 10), "short");
/// assert_eq!(truncate_with_marker("abcdef".to_string(), 3), "abc\n\n...[TRUNCATED]...");
/// ```
#[must_use]
pub fn truncate_with_marker(text: String, max_chars: usize) -> String {
    if char_len(&text) <= max_chars {
        return text;
    }
    let mut cut = safe_truncate_chars(&text, max_chars).to_string();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

/// Collapse every whitespace run to a single space and trim both ends
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
