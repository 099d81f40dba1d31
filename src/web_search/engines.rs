//! Search engine adapters
//!
//! Each supported engine is a plain data record: how to build its result URL,
//! which anchors hold results, how long to settle, and an optional
//! post-navigation behaviour picked from a small closed set. Adding an engine
//! means adding one entry to [`ENGINES`].

use std::time::Duration;

use super::errors::{WebSearchError, WebSearchResult};
use crate::utils::collapse_whitespace;

/// Behaviour run after navigation and settle, before results are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostNavigateHook {
    None,
    /// Extra randomized pause of `extra_wait` (±500ms)
    Settle,
    /// [`PostNavigateHook::Settle`], then a 100px scroll and a short pause
    SettleAndMicroScroll,
}

/// Static descriptor of one search engine
#[derive(Debug, Clone, Copy)]
pub struct EngineAdapter {
    pub name: &'static str,
    pub build_url: fn(&str) -> String,
    /// Selects the result anchors; text is the title, `href` the target
    pub result_selector: &'static str,
    pub clean_title: fn(&str) -> String,
    /// Base settle delay after the challenge check
    pub wait_after_nav: Duration,
    /// Base delay used by the post-navigation hook
    pub extra_wait: Duration,
    /// Leave the results tab open after extraction
    pub keep_tab_open: bool,
    pub post_navigate: PostNavigateHook,
}

/// Collapse whitespace runs in a result title
#[must_use]
pub fn default_clean_title(title: &str) -> String {
    collapse_whitespace(title)
}

fn bing_url(query: &str) -> String {
    format!("https://www.bing.com/search?q={}", urlencoding::encode(query))
}

fn duckduckgo_url(query: &str) -> String {
    format!("https://duckduckgo.com/?q={}&ia=web", urlencoding::encode(query))
}

fn baidu_url(query: &str) -> String {
    format!("https://www.baidu.com/s?wd={}", urlencoding::encode(query))
}

/// Registry of supported engines, in dispatch order
pub static ENGINES: [EngineAdapter; 3] = [
    EngineAdapter {
        name: "bing",
        build_url: bing_url,
        result_selector: "li.b_algo h2 a",
        clean_title: default_clean_title,
        wait_after_nav: Duration::from_millis(2202),
        extra_wait: Duration::from_millis(800),
        keep_tab_open: true,
        post_navigate: PostNavigateHook::SettleAndMicroScroll,
    },
    EngineAdapter {
        name: "duckduckgo",
        build_url: duckduckgo_url,
        result_selector: "a[data-testid='result-title-a']",
        clean_title: default_clean_title,
        wait_after_nav: Duration::from_millis(1344),
        extra_wait: Duration::ZERO,
        keep_tab_open: true,
        post_navigate: PostNavigateHook::None,
    },
    EngineAdapter {
        name: "baidu",
        build_url: baidu_url,
        result_selector: "div#content_left h3 a, div#content_left a",
        clean_title: default_clean_title,
        wait_after_nav: Duration::from_millis(1500),
        extra_wait: Duration::from_millis(1200),
        keep_tab_open: true,
        post_navigate: PostNavigateHook::Settle,
    },
];

/// Look up a single adapter by (case-insensitive) name
#[must_use]
pub fn find_engine(name: &str) -> Option<&'static EngineAdapter> {
    let name = name.trim().to_lowercase();
    ENGINES.iter().find(|e| e.name == name)
}

/// Resolve requested engine names against the registry
///
/// Unknown names are dropped. The result keeps registry order regardless of
/// request order. An empty request selects every engine.
///
/// # Errors
/// [`WebSearchError::NoEnginesSelected`] when nothing matched.
pub fn resolve_engines<S: AsRef<str>>(names: &[S]) -> WebSearchResult<Vec<&'static EngineAdapter>> {
    if names.is_empty() {
        return Ok(ENGINES.iter().collect());
    }

    let chosen: Vec<String> = names.iter().map(|n| n.as_ref().trim().to_lowercase()).collect();
    let selected: Vec<_> = ENGINES
        .iter()
        .filter(|e| chosen.iter().any(|c| c == e.name))
        .collect();

    if selected.is_empty() {
        return Err(WebSearchError::NoEnginesSelected {
            requested: names.iter().map(|n| n.as_ref().to_string()).collect(),
        });
    }
    Ok(selected)
}
