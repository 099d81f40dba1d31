//! Multi-engine web search
//!
//! Drives several search engines in parallel tabs of one browser context,
//! collects result links, then hands them to the crawl stage. See
//! [`run_web_search`] for the end-to-end flow.

pub mod engines;
pub mod errors;
pub mod run;
pub mod search;
pub mod types;

pub use engines::{ENGINES, EngineAdapter, PostNavigateHook, find_engine, resolve_engines};
pub use errors::{WebSearchError, WebSearchResult};
pub use run::{WebSearchRequest, execute_stages, run_web_search, run_web_search_rendered};
pub use search::{SearchOptions, extract_results, search};
pub use types::{SearchHit, dedup_hits};

use crate::utils::{MAX_QUERY_LENGTH, char_len};

/// Trim and validate a query before any browser resources are touched
///
/// # Errors
/// [`WebSearchError::EmptyQuery`] or [`WebSearchError::QueryTooLong`].
pub fn validate_query(query: &str) -> WebSearchResult<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(WebSearchError::EmptyQuery);
    }
    let len = char_len(trimmed);
    if len > MAX_QUERY_LENGTH {
        return Err(WebSearchError::QueryTooLong {
            len,
            max: MAX_QUERY_LENGTH,
        });
    }
    Ok(trimmed)
}
