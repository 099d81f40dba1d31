//! Per-page extraction pipeline
//!
//! `Navigate -> settle -> [GitHub thread] -> selectors -> main block ->
//! readability -> [body fallback] -> rank -> normalize`. Every failure on the
//! way becomes an error [`PageResult`]; nothing propagates to the caller.

use anyhow::{Context, Result, bail};
use serde_json::json;
use std::time::Duration;
use tokio::sync::Semaphore;

use super::article::extract_readable_blocking;
use super::extractors::{
    GITHUB_MIN_CHARS, auto_scroll, best_effort_wait_content, extract_by_selectors, extract_github_issue,
    extract_main_block,
};
use super::js_scripts::BODY_TEXT;
use super::schema::{ExtractionMethod, PageResult};
use super::scoring::rank_candidates;
use super::site_selectors::{is_github_thread, match_site_selectors};
use super::text::normalize_text;
use crate::browser::{BrowserContext, BrowserPage};
use crate::crawl_engine::page_timeout::with_page_timeout;
use crate::utils::{
    DEFAULT_JS_WAIT, DEFAULT_MAX_CHARS, DEFAULT_NAVIGATION_TIMEOUT, GITHUB_MAX_COMMENTS, char_len, host_of,
    human_sleep, path_of, scaled_ms,
};
use crate::web_search::SearchHit;

/// Floor for the post-navigation JS wait
const MIN_JS_WAIT_MS: u64 = 900;

/// Knobs for extracting one page
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub max_chars: usize,
    pub navigation_timeout: Duration,
    /// Base wait after navigation before any DOM read; floored at 900 ms
    pub js_wait: Duration,
    pub auto_scroll: bool,
    pub max_comments: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            js_wait: DEFAULT_JS_WAIT,
            auto_scroll: true,
            max_comments: GITHUB_MAX_COMMENTS,
        }
    }
}

/// Extract the best body text for one search hit
///
/// Holds one `semaphore` permit for the page's whole lifetime. The page is
/// always closed before returning.
pub async fn extract_page<C: BrowserContext>(
    context: &C,
    semaphore: &Semaphore,
    hit: &SearchHit,
    options: &ExtractOptions,
) -> PageResult {
    let Ok(_permit) = semaphore.acquire().await else {
        return PageResult::failed(&hit.engine, &hit.title, &hit.url, "crawl semaphore closed");
    };

    let page = match context.new_page().await {
        Ok(page) => page,
        Err(e) => {
            log::warn!("Failed to open page for {}: {e:#}", hit.url);
            return PageResult::failed(&hit.engine, &hit.title, &hit.url, format!("{e:#}"));
        }
    };

    let outcome = run_pipeline(&page, hit, options).await;

    if let Err(e) = page.close().await {
        log::debug!("Failed to close page for {}: {e:#}", hit.url);
    }

    match outcome {
        Ok(result) => {
            log::info!(
                "Extracted {} chars from {} via {}",
                char_len(&result.text),
                hit.url,
                result.method.map_or("-", ExtractionMethod::as_str)
            );
            result
        }
        Err(e) => {
            log::warn!("Extraction failed for {}: {e:#}", hit.url);
            PageResult::failed(&hit.engine, &hit.title, &hit.url, format!("{e:#}"))
        }
    }
}

async fn run_pipeline<P: BrowserPage>(page: &P, hit: &SearchHit, options: &ExtractOptions) -> Result<PageResult> {
    let max_chars = options.max_chars;

    with_page_timeout(page.goto(&hit.url), options.navigation_timeout, "navigation")
        .await
        .with_context(|| format!("Failed to navigate to {}", hit.url))?;

    let js_wait = u64::try_from(options.js_wait.as_millis()).unwrap_or(u64::MAX);
    human_sleep(scaled_ms(js_wait.max(MIN_JS_WAIT_MS)), scaled_ms(600)).await;

    let landed = page.url().await.unwrap_or_else(|_| hit.url.clone());
    best_effort_wait_content(page, &landed).await;

    if options.auto_scroll {
        auto_scroll(page).await?;
    }

    let final_url = page.url().await.context("Failed to read final URL")?;
    human_sleep(scaled_ms(250), scaled_ms(180)).await;

    let host = host_of(&final_url);
    let mut candidates: Vec<(ExtractionMethod, String)> = Vec::new();

    if is_github_thread(&host, &path_of(&final_url)) {
        human_sleep(scaled_ms(180), scaled_ms(160)).await;
        match extract_github_issue(page, max_chars, options.max_comments).await {
            Ok(text) if char_len(&text) >= GITHUB_MIN_CHARS => {
                candidates.push((ExtractionMethod::GithubIssue, text));
            }
            Ok(_) => {}
            Err(e) => log::debug!("GitHub thread extraction failed for {final_url}: {e:#}"),
        }
    }

    let by_selectors = extract_by_selectors(page, match_site_selectors(&host), max_chars).await;
    if !by_selectors.is_empty() {
        candidates.push((ExtractionMethod::Selectors, by_selectors));
    }

    let main_block = extract_main_block(page, max_chars).await?;
    if !main_block.is_empty() {
        candidates.push((ExtractionMethod::MainBlock, main_block));
    }

    let html = page.content().await.context("Failed to read page HTML")?;
    let mut page_title = None;
    match extract_readable_blocking(html, final_url.clone(), max_chars).await {
        Ok(article) => {
            if !article.title.is_empty() {
                page_title = Some(article.title);
            }
            if !article.text.is_empty() {
                candidates.push((ExtractionMethod::Readability, article.text));
            }
        }
        Err(e) => log::debug!("Readability produced nothing for {final_url}: {e:#}"),
    }

    if candidates.is_empty() {
        let body = page.evaluate(&BODY_TEXT, json!({})).await?;
        let body = normalize_text(body.as_str().unwrap_or_default(), max_chars);
        if !body.is_empty() {
            candidates.push((ExtractionMethod::Body, body));
        }
    }

    let ranked = rank_candidates(candidates);
    let diagnostics = ranked.iter().map(|c| c.diagnostics()).collect();
    let Some(winner) = ranked.into_iter().next() else {
        bail!("no extraction strategy produced any text");
    };

    human_sleep(scaled_ms(360), scaled_ms(220)).await;

    Ok(PageResult {
        engine: hit.engine.clone(),
        title: hit.title.clone(),
        url: hit.url.clone(),
        final_url: Some(final_url),
        page_title,
        method: Some(winner.method),
        score: Some(winner.weighted_score),
        text: normalize_text(&winner.text, max_chars),
        candidates: diagnostics,
        error: None,
    })
}
