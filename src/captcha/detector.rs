//! Verification-challenge detection
//!
//! Three probes run in order until one fires: URL tokens, DOM widgets (after a
//! forced settle wait so the widget has time to render), then body-text
//! keywords. Detection is best-effort: a probe that fails to evaluate counts
//! as "no match" and the next probe runs.

use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::browser::{BrowserPage, Locator};
use crate::page_extractor::js_scripts::BODY_TEXT;
use crate::utils::DEFAULT_CAPTCHA_SETTLE;

/// Substrings of a challenge page URL
pub const CAPTCHA_URL_TOKENS: &[&str] = &[
    "captcha",
    "challenge",
    "verify",
    "recaptcha",
    "hcaptcha",
    "cf-chl",
    "__cf_chl_",
    "turnstile",
];

/// Challenge containers and widgets, probed in order
pub const CAPTCHA_SELECTORS: &[&str] = &[
    ".captcha",
    ".captcha_header",
    ".captcha_text",
    "#turnstile-widget",
    "[data-sitekey]",
    r#"iframe[src*="microsoft"]"#,
    r#"iframe[src*="recaptcha"]"#,
    r#"iframe[src*="challenges.cloudflare.com"]"#,
    r#"iframe[src*="cf-chl"]"#,
    r#"input[name="cf-turnstile-response"]"#,
    ".captcha-box",
];

/// Lower-case phrases shown on verification interstitials
pub const CAPTCHA_KEYWORDS: &[&str] = &[
    "请解决以下难题",
    "最后一步",
    "确认您是真人",
    "人机验证",
    "安全验证",
    "verify you are human",
    "prove you're not a robot",
    "just a moment",
    "challenge platform",
];

/// True if `url` carries a challenge token (case-insensitive)
#[must_use]
pub fn url_has_captcha_token(url: &str) -> bool {
    let url = url.to_lowercase();
    CAPTCHA_URL_TOKENS.iter().any(|t| url.contains(t))
}

/// Matching challenge keyword in `body_text`, if any
#[must_use]
pub fn find_captcha_keyword(body_text: &str) -> Option<&'static str> {
    let lower = body_text.to_lowercase();
    CAPTCHA_KEYWORDS.iter().copied().find(|k| lower.contains(k))
}

#[derive(Debug, Clone)]
pub struct CaptchaDetector {
    settle: Duration,
}

impl Default for CaptchaDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTCHA_SETTLE)
    }
}

impl CaptchaDetector {
    #[must_use]
    pub fn new(settle: Duration) -> Self {
        Self { settle }
    }

    #[must_use]
    pub fn settle(&self) -> Duration {
        self.settle
    }

    /// Classify the page as a verification challenge. Never fails.
    pub async fn is_captcha_page<P: BrowserPage>(&self, page: &P) -> bool {
        let url = page.url().await.unwrap_or_default();
        debug!("CAPTCHA check for {url}");

        if url_has_captcha_token(&url) {
            info!("CAPTCHA detected by URL: {url}");
            return true;
        }

        tokio::time::sleep(self.settle).await;

        for selector in CAPTCHA_SELECTORS {
            match Locator::new(page, selector).count().await {
                Ok(n) if n > 0 => {
                    info!("CAPTCHA detected by element {selector} ({n} matches) on {url}");
                    return true;
                }
                Ok(_) => {}
                Err(e) => debug!("CAPTCHA probe {selector} failed: {e:#}"),
            }
        }

        match page.evaluate(&BODY_TEXT, json!({})).await {
            Ok(body) => {
                if let Some(keyword) = body.as_str().and_then(find_captcha_keyword) {
                    info!("CAPTCHA detected by page text \"{keyword}\" on {url}");
                    return true;
                }
            }
            Err(e) => debug!("CAPTCHA body text probe failed: {e:#}"),
        }

        debug!("No CAPTCHA on {url}");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_tokens_are_case_insensitive() {
        assert!(url_has_captcha_token("https://www.bing.com/Turnstile/check"));
        assert!(url_has_captcha_token("https://example.com/?__cf_chl_tk=abc"));
        assert!(!url_has_captcha_token("https://duckduckgo.com/?q=rust&ia=web"));
    }

    #[test]
    fn keywords_match_english_and_chinese() {
        assert_eq!(
            find_captcha_keyword("Please Verify You Are Human to continue"),
            Some("verify you are human")
        );
        assert_eq!(find_captcha_keyword("百度安全验证"), Some("安全验证"));
        assert_eq!(find_captcha_keyword("Ordinary search results"), None);
    }
}
