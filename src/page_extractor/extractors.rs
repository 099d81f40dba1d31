//! Extraction strategies run against a rendered page
//!
//! Each strategy returns normalized text, or an empty string when it found
//! nothing worth keeping. Strategies never fail the page: evaluation errors are
//! logged and treated as "no candidate".

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::js_scripts::{AUTO_SCROLL, GITHUB_ISSUE, MAIN_BLOCK_CANDIDATES};
use super::scoring::score_text;
use super::site_selectors::{GITHUB_DISCUSSION_READY, settle_target};
use super::text::normalize_text;
use crate::browser::{BrowserPage, Locator, wait_for_load_state};
use crate::crawl_engine::page_timeout::with_page_timeout;
use crate::utils::{char_len, host_of, human_sleep, path_of, scaled_ms};

/// Selector text shorter than this is rejected and the next selector tried
pub const SELECTOR_MIN_CHARS: usize = 200;
/// Assembled GitHub thread text shorter than this is not a candidate
pub const GITHUB_MIN_CHARS: usize = 160;
/// Comments shorter than this are "+1 / thanks" noise
const GITHUB_MIN_COMMENT_CHARS: usize = 30;

const MAIN_BLOCK_MIN_CHARS: usize = 180;
const MAIN_BLOCK_MAX_LINK_DENSITY: f64 = 0.45;
const MAIN_BLOCK_RESCORE_LIMIT: usize = 25;
const MAIN_BLOCK_LINK_DENSITY_PENALTY: f64 = 80.0;

fn scaled(ms: u64) -> Duration {
    Duration::from_millis(scaled_ms(ms))
}

/// Best-effort hydration wait: document ready, then a host-specific container
///
/// Both waits are bounded and their outcomes discarded.
pub async fn best_effort_wait_content<P: BrowserPage>(page: &P, final_url: &str) {
    let ready = wait_for_load_state(page, scaled(6000)).await;
    let target = settle_target(&host_of(final_url), &path_of(final_url));
    let settled = Locator::new(page, target.selector)
        .wait_for(scaled(target.timeout_ms))
        .await;
    log::debug!(
        "Settle wait for {final_url}: ready={}, '{}' found={}",
        ready.is_found(),
        target.selector,
        settled.is_found()
    );
}

/// Scroll through the page to trigger lazy-loaded content
pub async fn auto_scroll<P: BrowserPage>(page: &P) -> Result<()> {
    page.evaluate(&AUTO_SCROLL, json!({}))
        .await
        .context("Auto-scroll script failed")?;
    human_sleep(scaled_ms(260), scaled_ms(200)).await;
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GithubThread {
    pub title: String,
    pub main_body: String,
    pub comments: Vec<String>,
}

impl GithubThread {
    /// Title, body and labeled comments joined into one normalized text
    #[must_use]
    pub fn assemble(&self, max_chars: usize) -> String {
        let mut parts: Vec<String> = Vec::new();
        for head in [self.title.trim(), self.main_body.trim()] {
            if !head.is_empty() {
                parts.push(head.to_string());
            }
        }
        for (i, comment) in self.comments.iter().enumerate() {
            let comment = comment.trim();
            if char_len(comment) < GITHUB_MIN_COMMENT_CHARS {
                continue;
            }
            parts.push(format!("--- Comment {} ---\n{comment}", i + 1));
        }
        normalize_text(&parts.join("\n\n"), max_chars)
    }
}

/// Issue/PR thread text: title, first comment, then up to `max_comments` replies
pub async fn extract_github_issue<P: BrowserPage>(page: &P, max_chars: usize, max_comments: usize) -> Result<String> {
    let _ = Locator::new(page, GITHUB_DISCUSSION_READY)
        .wait_for(scaled(9000))
        .await;

    let raw = page
        .evaluate(&GITHUB_ISSUE, json!({ "maxComments": max_comments }))
        .await?;
    let thread: GithubThread = serde_json::from_value(raw).context("Unexpected GitHub thread shape")?;
    Ok(thread.assemble(max_chars))
}

/// First selector whose element text reaches [`SELECTOR_MIN_CHARS`]
pub async fn extract_by_selectors<P: BrowserPage>(page: &P, selectors: &[&str], max_chars: usize) -> String {
    for &selector in selectors {
        match try_selector(page, selector, max_chars).await {
            Ok(Some(text)) => return text,
            Ok(None) => {}
            Err(e) => log::trace!("Selector '{selector}' failed: {e:#}"),
        }
    }
    String::new()
}

async fn try_selector<P: BrowserPage>(page: &P, selector: &str, max_chars: usize) -> Result<Option<String>> {
    let locator = Locator::new(page, selector);
    if locator.count().await? == 0 {
        return Ok(None);
    }

    human_sleep(scaled_ms(140), scaled_ms(120)).await;
    let _ = locator.wait_for(scaled(2500)).await;

    let raw = with_page_timeout(locator.first_inner_text(), scaled(6500), "inner_text").await?;
    let text = normalize_text(raw.as_deref().unwrap_or_default(), max_chars);
    Ok((char_len(&text) >= SELECTOR_MIN_CHARS).then_some(text))
}

/// One structural container reported by the page
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlockCandidate {
    pub text: String,
    /// Link density: anchor text length over total text length
    pub ld: f64,
}

/// Pick the best main-content block
///
/// Drops short or link-heavy blocks, ranks the rest by
/// `len / (1 + 2·ld)`, then rescores the top few by text quality minus a
/// link-density penalty. Returns an empty string unless some block scores
/// above zero.
#[must_use]
pub fn select_main_block(blocks: Vec<BlockCandidate>, max_chars: usize) -> String {
    let mut ranked: Vec<(f64, BlockCandidate)> = blocks
        .into_iter()
        .filter_map(|block| {
            let len = char_len(&block.text);
            (len >= MAIN_BLOCK_MIN_CHARS && block.ld <= MAIN_BLOCK_MAX_LINK_DENSITY)
                .then(|| (len as f64 / (1.0 + 2.0 * block.ld), block))
        })
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut best_text = String::new();
    let mut best_score = 0.0;
    for (_, block) in ranked.into_iter().take(MAIN_BLOCK_RESCORE_LIMIT) {
        let text = normalize_text(&block.text, max_chars);
        let score = score_text(&text) - block.ld * MAIN_BLOCK_LINK_DENSITY_PENALTY;
        if score > best_score {
            best_score = score;
            best_text = text;
        }
    }
    best_text
}

/// Main-block heuristic over every structural container on the page
pub async fn extract_main_block<P: BrowserPage>(page: &P, max_chars: usize) -> Result<String> {
    let raw = page.evaluate(&MAIN_BLOCK_CANDIDATES, json!({})).await?;
    let blocks: Vec<BlockCandidate> = serde_json::from_value(raw).context("Unexpected main-block candidate shape")?;
    Ok(select_main_block(blocks, max_chars))
}
