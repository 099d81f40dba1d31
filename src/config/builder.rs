//! Validating builder for `WebSearchConfig`

use super::types::WebSearchConfig;
use crate::web_search::{WebSearchError, WebSearchResult};

/// Fluent builder starting from [`WebSearchConfig::default`]
#[derive(Debug, Clone, Default)]
pub struct WebSearchConfigBuilder {
    pub(crate) config: WebSearchConfig,
}

impl WebSearchConfig {
    /// Create a builder for configuring a `WebSearchConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> WebSearchConfigBuilder {
        WebSearchConfigBuilder::default()
    }
}

impl WebSearchConfigBuilder {
    /// Validate and produce the config
    ///
    /// # Errors
    /// [`WebSearchError::InvalidConfig`] when a count is zero or the default
    /// engine list is empty.
    pub fn build(self) -> WebSearchResult<WebSearchConfig> {
        let c = self.config;
        for (name, value) in [
            ("top_k_each", c.top_k_each),
            ("tab_concurrency", c.tab_concurrency),
            ("crawl_concurrency", c.crawl_concurrency),
            ("max_chars", c.max_chars),
        ] {
            if value == 0 {
                return Err(WebSearchError::InvalidConfig(format!("{name} must be at least 1")));
            }
        }
        if c.engines.is_empty() {
            return Err(WebSearchError::InvalidConfig("engines must not be empty".to_string()));
        }
        if c.captcha_poll_interval.is_zero() {
            return Err(WebSearchError::InvalidConfig(
                "captcha_poll_interval must be non-zero".to_string(),
            ));
        }
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = WebSearchConfig::builder().build().unwrap();
        assert_eq!(config.engines(), ["bing", "duckduckgo", "baidu"]);
        assert_eq!(config.crawl_concurrency(), 8);
        assert!(config.debug_log());
        assert!(!config.headless());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = WebSearchConfig::builder().crawl_concurrency(0).build().unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("crawl_concurrency"));
    }

    #[test]
    fn env_overrides_follow_string_flags() {
        let env = |key: &str| match key {
            "HEADLESS" => Some("True".to_string()),
            "DEBUG" => Some("false".to_string()),
            _ => None,
        };
        let config = WebSearchConfig::builder().env_overrides_from(env).build().unwrap();
        assert!(config.headless());
        assert!(!config.debug_log());

        let untouched = WebSearchConfig::builder().env_overrides_from(|_| None).build().unwrap();
        assert!(!untouched.headless());
        assert!(untouched.debug_log());
    }
}
