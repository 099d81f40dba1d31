//! Shared configuration constants for websearch
//!
//! Default values and tuning knobs used across the search, extraction and
//! cache layers so that no stage carries its own magic numbers.

use std::time::Duration;

/// Engines queried when the caller does not name any
pub const DEFAULT_ENGINES: [&str; 3] = ["bing", "duckduckgo", "baidu"];

/// Result anchors collected per engine
pub const DEFAULT_TOP_K: usize = 10;

/// Simultaneously open search tabs (stage 1)
pub const DEFAULT_TAB_CONCURRENCY: usize = 3;

/// Simultaneously crawled result pages (stage 2)
pub const DEFAULT_CRAWL_CONCURRENCY: usize = 8;

/// Characters kept per extracted page before the truncation marker
pub const DEFAULT_MAX_CHARS: usize = 5000;

/// Characters kept by the post-crawl paragraph re-flow
pub const CLEAN_TEXT_MAX_CHARS: usize = 10_000;

/// Lifetime of a cached per-engine browser state: 2 hours
///
/// Search engines rotate their anti-bot cookies on the order of hours, so a
/// state older than this is more likely to trigger a fresh challenge than
/// to skip one.
pub const DEFAULT_STATE_TTL: Duration = Duration::from_secs(7200);

/// Upper bound for page navigation (goto until DOM content loaded)
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(25);

/// Base settle delay after navigation, before any extraction
pub const DEFAULT_JS_WAIT: Duration = Duration::from_millis(900);

/// Forced wait before DOM-based CAPTCHA probing
///
/// Challenge widgets (Turnstile, reCAPTCHA) render asynchronously after
/// DOMContentLoaded. This is a tunable constant, not a readiness condition.
pub const DEFAULT_CAPTCHA_SETTLE: Duration = Duration::from_secs(10);

/// Maximum time a human operator gets to solve a challenge
pub const DEFAULT_CAPTCHA_TIMEOUT: Duration = Duration::from_secs(120);

/// Interval between CAPTCHA resolution checks
pub const DEFAULT_CAPTCHA_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Maximum search query length in characters
pub const MAX_QUERY_LENGTH: usize = 500;

/// Comments collected from a GitHub issue / PR thread after the opening post
pub const GITHUB_MAX_COMMENTS: usize = 10;

/// Appended to any text cut at its character budget
pub const TRUNCATION_MARKER: &str = "\n\n...[TRUNCATED]...";

/// Name of the debug log file inside the cache directory
pub const DEBUG_LOG_FILE: &str = "debug.log";

/// Chrome user agent string for stealth mode
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Viewport applied to every page opened by the crawler
pub const VIEWPORT_WIDTH: i64 = 1920;
pub const VIEWPORT_HEIGHT: i64 = 1080;

/// Off-screen placement used in headed mode so the window stays out of the way
/// until a CAPTCHA brings a tab to the front.
pub const OFFSCREEN_X: i64 = -20_000;
pub const OFFSCREEN_Y: i64 = -20_000;
pub const OFFSCREEN_WIDTH: i64 = 1200;
pub const OFFSCREEN_HEIGHT: i64 = 900;
