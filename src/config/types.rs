//! Core configuration type for a web search run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::{
    DEFAULT_CAPTCHA_POLL_INTERVAL, DEFAULT_CAPTCHA_SETTLE, DEFAULT_CAPTCHA_TIMEOUT, DEFAULT_CRAWL_CONCURRENCY,
    DEFAULT_ENGINES, DEFAULT_JS_WAIT, DEFAULT_MAX_CHARS, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_STATE_TTL,
    DEFAULT_TAB_CONCURRENCY, DEFAULT_TOP_K,
};

/// Settings shared by every search invocation
///
/// Built through [`WebSearchConfig::builder`], which validates ranges.
/// Per-request values (`top_k_each`, `crawl_concurrency`, `max_chars`) can be
/// overridden by the request itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchConfig {
    /// Engines searched when a request names none
    pub(crate) engines: Vec<String>,
    pub(crate) top_k_each: usize,
    /// Simultaneously open search-engine tabs
    pub(crate) tab_concurrency: usize,
    /// Simultaneously open result-page tabs
    pub(crate) crawl_concurrency: usize,
    /// Per-page text budget in characters
    pub(crate) max_chars: usize,

    pub(crate) use_state_cache: bool,
    /// Holds cached engine state, `debug.log` and any downloaded Chromium
    pub(crate) cache_dir: PathBuf,
    #[serde(with = "duration_secs")]
    pub(crate) state_ttl: Duration,

    pub(crate) headless: bool,
    /// Move the headed window off-screen after launch
    pub(crate) offscreen_window: bool,
    /// Mirror logs into a per-run `debug.log`
    pub(crate) debug_log: bool,

    #[serde(with = "duration_millis")]
    pub(crate) navigation_timeout: Duration,
    #[serde(with = "duration_millis")]
    pub(crate) js_wait: Duration,
    pub(crate) auto_scroll: bool,

    #[serde(with = "duration_millis")]
    pub(crate) captcha_settle: Duration,
    #[serde(with = "duration_millis")]
    pub(crate) captcha_timeout: Duration,
    #[serde(with = "duration_millis")]
    pub(crate) captcha_poll_interval: Duration,
}

/// `<platform cache dir>/kodegen/websearch`, or a temp-dir fallback
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("kodegen")
        .join("websearch")
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            engines: DEFAULT_ENGINES.iter().map(|e| (*e).to_string()).collect(),
            top_k_each: DEFAULT_TOP_K,
            tab_concurrency: DEFAULT_TAB_CONCURRENCY,
            crawl_concurrency: DEFAULT_CRAWL_CONCURRENCY,
            max_chars: DEFAULT_MAX_CHARS,
            use_state_cache: true,
            cache_dir: default_cache_dir(),
            state_ttl: DEFAULT_STATE_TTL,
            headless: false,
            offscreen_window: false,
            debug_log: true,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            js_wait: DEFAULT_JS_WAIT,
            auto_scroll: true,
            captcha_settle: DEFAULT_CAPTCHA_SETTLE,
            captcha_timeout: DEFAULT_CAPTCHA_TIMEOUT,
            captcha_poll_interval: DEFAULT_CAPTCHA_POLL_INTERVAL,
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
