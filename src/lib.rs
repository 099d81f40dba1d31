//! Multi-engine browser web search with site-aware content extraction.
//!
//! A query is run against several engines in tabs of one Chromium context.
//! Result links are crawled concurrently, each page goes through a ladder of
//! extraction strategies, and the scored winners are returned as JSON or
//! Markdown.

pub mod browser;
pub mod captcha;
pub mod config;
pub mod crawl_engine;
pub mod logging;
pub mod page_extractor;
pub mod results;
pub mod state_cache;
pub mod utils;
pub mod web_search;

pub use browser::{BrowserContext, BrowserPage, BrowserWrapper, launch_browser};
pub use captcha::{CaptchaCoordinator, CaptchaDetector};
pub use config::{WebSearchConfig, WebSearchConfigBuilder};
pub use page_extractor::{ExtractionMethod, PageResult};
pub use results::{ResponseFormat, WebSearchHit, WebSearchResponse};
pub use state_cache::{StateCacheManager, StorageState};
pub use web_search::{
    SearchHit, WebSearchError, WebSearchRequest, WebSearchResult, run_web_search, run_web_search_rendered,
};
