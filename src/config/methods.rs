//! Builder setters and environment overrides

use std::path::PathBuf;
use std::time::Duration;

use super::builder::WebSearchConfigBuilder;

/// `HEADLESS=true` runs the browser without a window
pub const HEADLESS_ENV: &str = "HEADLESS";
/// `DEBUG=false` disables the per-run debug log
pub const DEBUG_ENV: &str = "DEBUG";

impl WebSearchConfigBuilder {
    #[must_use]
    pub fn engines<S: Into<String>>(mut self, engines: impl IntoIterator<Item = S>) -> Self {
        self.config.engines = engines.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn top_k_each(mut self, n: usize) -> Self {
        self.config.top_k_each = n;
        self
    }

    #[must_use]
    pub fn tab_concurrency(mut self, n: usize) -> Self {
        self.config.tab_concurrency = n;
        self
    }

    #[must_use]
    pub fn crawl_concurrency(mut self, n: usize) -> Self {
        self.config.crawl_concurrency = n;
        self
    }

    #[must_use]
    pub fn max_chars(mut self, n: usize) -> Self {
        self.config.max_chars = n;
        self
    }

    #[must_use]
    pub fn use_state_cache(mut self, enabled: bool) -> Self {
        self.config.use_state_cache = enabled;
        self
    }

    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    #[must_use]
    pub fn state_ttl(mut self, ttl: Duration) -> Self {
        self.config.state_ttl = ttl;
        self
    }

    /// Run without a visible window
    ///
    /// Headed mode (the default) lets an operator solve CAPTCHA challenges in
    /// the live window; headless runs simply wait out the challenge timeout.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn offscreen_window(mut self, enabled: bool) -> Self {
        self.config.offscreen_window = enabled;
        self
    }

    #[must_use]
    pub fn debug_log(mut self, enabled: bool) -> Self {
        self.config.debug_log = enabled;
        self
    }

    #[must_use]
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.config.navigation_timeout = timeout;
        self
    }

    #[must_use]
    pub fn js_wait(mut self, wait: Duration) -> Self {
        self.config.js_wait = wait;
        self
    }

    #[must_use]
    pub fn auto_scroll(mut self, enabled: bool) -> Self {
        self.config.auto_scroll = enabled;
        self
    }

    #[must_use]
    pub fn captcha_settle(mut self, settle: Duration) -> Self {
        self.config.captcha_settle = settle;
        self
    }

    #[must_use]
    pub fn captcha_timeout(mut self, timeout: Duration) -> Self {
        self.config.captcha_timeout = timeout;
        self
    }

    #[must_use]
    pub fn captcha_poll_interval(mut self, interval: Duration) -> Self {
        self.config.captcha_poll_interval = interval;
        self
    }

    /// Apply `HEADLESS` and `DEBUG` from the process environment
    #[must_use]
    pub fn env_overrides(self) -> Self {
        self.env_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `HEADLESS` and `DEBUG` from `lookup`; a flag is on iff its value
    /// is `true` (case-insensitive). Unset variables leave the field alone.
    #[must_use]
    pub fn env_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(HEADLESS_ENV) {
            self.config.headless = v.trim().eq_ignore_ascii_case("true");
        }
        if let Some(v) = lookup(DEBUG_ENV) {
            self.config.debug_log = v.trim().eq_ignore_ascii_case("true");
        }
        self
    }
}
