//! Accessors for `WebSearchConfig`

use std::path::Path;
use std::time::Duration;

use super::types::WebSearchConfig;

impl WebSearchConfig {
    #[must_use]
    pub fn engines(&self) -> &[String] {
        &self.engines
    }

    #[must_use]
    pub fn top_k_each(&self) -> usize {
        self.top_k_each
    }

    #[must_use]
    pub fn tab_concurrency(&self) -> usize {
        self.tab_concurrency
    }

    #[must_use]
    pub fn crawl_concurrency(&self) -> usize {
        self.crawl_concurrency
    }

    #[must_use]
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    #[must_use]
    pub fn use_state_cache(&self) -> bool {
        self.use_state_cache
    }

    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    #[must_use]
    pub fn state_ttl(&self) -> Duration {
        self.state_ttl
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn offscreen_window(&self) -> bool {
        self.offscreen_window
    }

    #[must_use]
    pub fn debug_log(&self) -> bool {
        self.debug_log
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        self.navigation_timeout
    }

    #[must_use]
    pub fn js_wait(&self) -> Duration {
        self.js_wait
    }

    #[must_use]
    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    #[must_use]
    pub fn captcha_settle(&self) -> Duration {
        self.captcha_settle
    }

    #[must_use]
    pub fn captcha_timeout(&self) -> Duration {
        self.captcha_timeout
    }

    #[must_use]
    pub fn captcha_poll_interval(&self) -> Duration {
        self.captcha_poll_interval
    }

    /// Path of the per-run debug log inside the cache directory
    #[must_use]
    pub fn debug_log_path(&self) -> std::path::PathBuf {
        self.cache_dir.join(crate::utils::DEBUG_LOG_FILE)
    }
}
