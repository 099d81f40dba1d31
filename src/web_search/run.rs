//! End-to-end search run: launch, search, crawl, persist, aggregate

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::engines::resolve_engines;
use super::errors::WebSearchResult;
use super::search::{SearchOptions, search};
use super::validate_query;
use crate::browser::{BrowserContext, BrowserWrapper, ChromiumContext, launch_browser, move_window_offscreen};
use crate::captcha::{CaptchaCoordinator, CaptchaDetector};
use crate::config::WebSearchConfig;
use crate::crawl_engine::crawl_hits;
use crate::logging::clear_debug_log;
use crate::page_extractor::{ExtractOptions, PageResult};
use crate::results::{ResponseFormat, WebSearchResponse, aggregate, clean_results};
use crate::state_cache::{StateCacheManager, StorageState};
use crate::utils::GITHUB_MAX_COMMENTS;

/// One caller invocation; unset fields fall back to the config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebSearchRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub crawl_concurrency: Option<usize>,
    #[serde(default)]
    pub max_chars: Option<usize>,
    #[serde(default)]
    pub engines: Option<Vec<String>>,
    #[serde(default)]
    pub format: ResponseFormat,
}

impl WebSearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Search, crawl and aggregate one query
///
/// # Errors
/// Configuration problems (empty or oversized query, no usable engine) before
/// any browser activity, and browser launch failures. Engine and page
/// failures only shrink the result set.
pub async fn run_web_search(config: &WebSearchConfig, request: &WebSearchRequest) -> WebSearchResult<WebSearchResponse> {
    let query = validate_query(&request.query)?;
    let engine_names: Vec<String> = request
        .engines
        .clone()
        .unwrap_or_else(|| config.engines().to_vec());
    let engines = resolve_engines(&engine_names)?;
    let engine_names: Vec<String> = engines.iter().map(|e| e.name.to_string()).collect();

    if config.debug_log() {
        clear_debug_log(&config.debug_log_path());
    }
    info!("Web search for '{query}' on {}", engine_names.join(", "));

    let state_manager = config
        .use_state_cache()
        .then(|| StateCacheManager::new(config.cache_dir(), config.state_ttl()));
    let cached_state = match &state_manager {
        Some(manager) => manager.load_merged_state(&engine_names).await,
        None => None,
    };

    let wrapper = launch_browser(config.headless(), config.cache_dir()).await?;
    let outcome = search_and_crawl(
        &wrapper,
        config,
        request,
        query,
        &engine_names,
        cached_state.as_ref(),
        state_manager.as_ref(),
    )
    .await;
    if let Err(e) = wrapper.shutdown().await {
        warn!("Browser shutdown failed: {e:#}");
    }

    let pages = outcome?;
    let crawled = pages.len();
    let good = aggregate(pages);
    info!("Returning {} of {crawled} crawled page(s)", good.len());
    Ok(WebSearchResponse::new(query, &good))
}

/// [`run_web_search`] rendered in the request's format
pub async fn run_web_search_rendered(config: &WebSearchConfig, request: &WebSearchRequest) -> WebSearchResult<String> {
    let response = run_web_search(config, request).await?;
    Ok(response.render(request.format)?)
}

async fn search_and_crawl(
    wrapper: &BrowserWrapper,
    config: &WebSearchConfig,
    request: &WebSearchRequest,
    query: &str,
    engine_names: &[String],
    cached_state: Option<&StorageState>,
    state_manager: Option<&StateCacheManager>,
) -> WebSearchResult<Vec<PageResult>> {
    let context = ChromiumContext::open(wrapper.browser(), cached_state).await?;

    // Headed runs keep one blank tab for the whole run.
    let _keepalive = if config.headless() {
        None
    } else {
        match wrapper.open_keepalive_page().await {
            Ok(page) => {
                if config.offscreen_window() {
                    move_window_offscreen(&page).await;
                }
                Some(page)
            }
            Err(e) => {
                warn!("{e:#}");
                None
            }
        }
    };

    let coordinator = CaptchaCoordinator::new(
        CaptchaDetector::new(config.captcha_settle()),
        config.captcha_poll_interval(),
        config.captcha_timeout(),
    );

    execute_stages(&context, config, request, query, engine_names, state_manager, &coordinator).await
}

/// Search stage, then crawl stage, then state capture, on any browser context
///
/// # Errors
/// Only [`super::WebSearchError::NoEnginesSelected`].
pub async fn execute_stages<C: BrowserContext>(
    context: &C,
    config: &WebSearchConfig,
    request: &WebSearchRequest,
    query: &str,
    engine_names: &[String],
    state_manager: Option<&StateCacheManager>,
    coordinator: &CaptchaCoordinator,
) -> WebSearchResult<Vec<PageResult>> {
    let search_options = SearchOptions {
        top_k_each: request.top_k.unwrap_or(config.top_k_each()).max(1),
        tab_concurrency: config.tab_concurrency(),
        navigation_timeout: config.navigation_timeout(),
    };
    let hits = search(context, query, engine_names, search_options, state_manager, coordinator).await?;

    let extract_options = ExtractOptions {
        max_chars: request.max_chars.unwrap_or(config.max_chars()).max(1),
        navigation_timeout: config.navigation_timeout(),
        js_wait: config.js_wait(),
        auto_scroll: config.auto_scroll(),
        max_comments: GITHUB_MAX_COMMENTS,
    };
    let crawl_concurrency = request
        .crawl_concurrency
        .unwrap_or(config.crawl_concurrency());
    let mut pages = crawl_hits(context, &hits, crawl_concurrency, &extract_options).await;
    clean_results(&mut pages);

    if let Some(manager) = state_manager {
        for engine in engine_names {
            manager.save_context_state(context, engine).await;
        }
    }
    Ok(pages)
}
