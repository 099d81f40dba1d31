//! Core search execution logic
//!
//! Fans one query out to every selected engine adapter, one tab per engine,
//! under a semaphore bounding the number of simultaneously open tabs.
//! Engine-level failures are contained: a failed engine contributes zero hits.

use anyhow::{Context, Result};
use futures::future::join_all;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::engines::{EngineAdapter, PostNavigateHook, resolve_engines};
use super::errors::WebSearchResult;
use super::types::{SearchHit, dedup_hits};
use crate::browser::{BrowserContext, BrowserPage, Locator};
use crate::captcha::CaptchaCoordinator;
use crate::crawl_engine::page_timeout::with_page_timeout;
use crate::page_extractor::js_scripts::{MICRO_SCROLL, NTH_RESULT_LINK};
use crate::state_cache::StateCacheManager;
use crate::utils::{DEFAULT_NAVIGATION_TIMEOUT, human_sleep};

/// Knobs for one search stage
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Result anchors collected per engine
    pub top_k_each: usize,
    /// Simultaneously open engine tabs
    pub tab_concurrency: usize,
    pub navigation_timeout: std::time::Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k_each: crate::utils::DEFAULT_TOP_K,
            tab_concurrency: crate::utils::DEFAULT_TAB_CONCURRENCY,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawResultLink {
    title: Option<String>,
    href: Option<String>,
}

/// Search every named engine and return URL-deduplicated hits
///
/// Hits are concatenated in engine registry order, so when two engines return
/// the same URL the earlier engine's hit is kept.
///
/// # Errors
/// Only [`super::WebSearchError::NoEnginesSelected`]; raised before any page
/// is opened.
pub async fn search<C: BrowserContext>(
    context: &C,
    query: &str,
    engine_names: &[String],
    options: SearchOptions,
    state_manager: Option<&StateCacheManager>,
    coordinator: &CaptchaCoordinator,
) -> WebSearchResult<Vec<SearchHit>> {
    let engines = resolve_engines(engine_names)?;
    let semaphore = Semaphore::new(options.tab_concurrency.max(1));

    info!(
        "Searching {} engine(s) for '{}' (top {} each, {} tabs)",
        engines.len(),
        query,
        options.top_k_each,
        options.tab_concurrency
    );

    let tasks = engines.iter().map(|engine| {
        let semaphore = &semaphore;
        async move {
            match fetch_engine(context, semaphore, query, engine, options, state_manager, coordinator).await {
                Ok(hits) => {
                    info!("[{}] extracted {} results", engine.name, hits.len());
                    hits
                }
                Err(e) => {
                    warn!("[{}] engine failed, continuing without it: {e:#}", engine.name);
                    Vec::new()
                }
            }
        }
    });

    let hits: Vec<SearchHit> = join_all(tasks).await.into_iter().flatten().collect();
    let total = hits.len();
    let deduped = dedup_hits(hits);
    info!("Search stage produced {} unique hits ({} before dedup)", deduped.len(), total);
    Ok(deduped)
}

/// Run one engine adapter in its own tab
async fn fetch_engine<C: BrowserContext>(
    context: &C,
    semaphore: &Semaphore,
    query: &str,
    engine: &EngineAdapter,
    options: SearchOptions,
    state_manager: Option<&StateCacheManager>,
    coordinator: &CaptchaCoordinator,
) -> Result<Vec<SearchHit>> {
    let _permit = semaphore
        .acquire()
        .await
        .context("search semaphore closed")?;

    human_sleep(800, 400).await;
    let page = context.new_page().await.context("Failed to open search tab")?;

    let outcome = run_engine_on_page(context, &page, query, engine, options, state_manager, coordinator).await;

    if !engine.keep_tab_open
        && let Err(e) = page.close().await
    {
        debug!("[{}] failed to close search tab: {e:#}", engine.name);
    }
    outcome
}

async fn run_engine_on_page<C: BrowserContext>(
    context: &C,
    page: &C::Page,
    query: &str,
    engine: &EngineAdapter,
    options: SearchOptions,
    state_manager: Option<&StateCacheManager>,
    coordinator: &CaptchaCoordinator,
) -> Result<Vec<SearchHit>> {
    let url = (engine.build_url)(query);
    info!("[{}] navigating to {url}", engine.name);

    human_sleep(180, 60).await;
    with_page_timeout(page.goto(&url), options.navigation_timeout, "search navigation")
        .await
        .with_context(|| format!("Failed to navigate to {url}"))?;

    let current_url = page.url().await.unwrap_or_default();
    match page.title().await {
        Ok(title) => debug!("[{}] landed on {current_url} ({title})", engine.name),
        Err(_) => debug!("[{}] landed on {current_url} (title unavailable)", engine.name),
    }

    if coordinator.is_captcha_page(page).await {
        let resolved = coordinator
            .resolve_challenge(page, engine.name, || async {
                if let Some(manager) = state_manager {
                    manager.save_context_state(context, engine.name).await;
                }
            })
            .await;
        if let Err(e) = resolved {
            // Soft failure: still try to read whatever the page shows.
            warn!("[{}] {e}", engine.name);
        }
    }

    human_sleep(millis(engine.wait_after_nav), 500).await;
    run_post_navigate(page, engine).await;

    Ok(extract_results(page, engine, options.top_k_each).await)
}

async fn run_post_navigate<P: BrowserPage>(page: &P, engine: &EngineAdapter) {
    match engine.post_navigate {
        PostNavigateHook::None => {}
        PostNavigateHook::Settle => {
            human_sleep(millis(engine.extra_wait), 500).await;
        }
        PostNavigateHook::SettleAndMicroScroll => {
            human_sleep(millis(engine.extra_wait), 500).await;
            match page.evaluate(&MICRO_SCROLL, json!({ "dy": 100 })).await {
                Ok(_) => human_sleep(300, 200).await,
                Err(e) => debug!("[{}] micro-scroll failed: {e:#}", engine.name),
            }
        }
    }
}

/// Read up to `top_k` `(title, href)` pairs from the engine's result anchors
///
/// Items missing a title or an href are skipped individually.
pub async fn extract_results<P: BrowserPage>(page: &P, engine: &EngineAdapter, top_k: usize) -> Vec<SearchHit> {
    let count = match Locator::new(page, engine.result_selector).count().await {
        Ok(count) => count,
        Err(e) => {
            warn!("[{}] failed to count result anchors: {e:#}", engine.name);
            return Vec::new();
        }
    };

    let mut hits = Vec::new();
    for index in 0..count.min(top_k) {
        human_sleep(320, 120).await;

        let raw = match page
            .evaluate(
                &NTH_RESULT_LINK,
                json!({ "selector": engine.result_selector, "index": index }),
            )
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                debug!("[{}] result {index} unreadable: {e:#}", engine.name);
                continue;
            }
        };

        let Ok(Some(link)) = serde_json::from_value::<Option<RawResultLink>>(raw) else {
            continue;
        };
        let (Some(title), Some(href)) = (link.title, link.href) else {
            continue;
        };
        if title.trim().is_empty() || href.is_empty() {
            continue;
        }

        hits.push(SearchHit::new(engine.name, (engine.clean_title)(title.trim()), href));
    }
    hits
}

fn millis(d: std::time::Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
