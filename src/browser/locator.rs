//! Selector-scoped queries and best-effort waits
//!
//! Waits in this module never fail. They report a [`WaitOutcome`] and every
//! caller decides explicitly what to do with it, which in this crate is almost
//! always "ignore and continue".

use anyhow::{Context, Result};
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

use super::BrowserPage;
use crate::page_extractor::js_scripts::{DOCUMENT_READY_STATE, SELECTOR_COUNT, SELECTOR_INNER_TEXT};

/// Interval between polls of a pending wait
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a bounded wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Found,
    TimedOut,
}

impl WaitOutcome {
    #[must_use]
    pub fn is_found(self) -> bool {
        matches!(self, WaitOutcome::Found)
    }
}

/// Elements matching a CSS selector on one page
pub struct Locator<'a, P: BrowserPage> {
    page: &'a P,
    selector: &'a str,
}

impl<'a, P: BrowserPage> Locator<'a, P> {
    pub fn new(page: &'a P, selector: &'a str) -> Self {
        Self { page, selector }
    }

    /// Number of matching elements
    pub async fn count(&self) -> Result<usize> {
        let value = self
            .page
            .evaluate(&SELECTOR_COUNT, json!({ "selector": self.selector }))
            .await?;
        let count = value
            .as_u64()
            .with_context(|| format!("selector count for '{}' was not a number", self.selector))?;
        Ok(usize::try_from(count).unwrap_or(usize::MAX))
    }

    /// `innerText` of the first match, `None` when nothing matches
    pub async fn first_inner_text(&self) -> Result<Option<String>> {
        let value = self
            .page
            .evaluate(&SELECTOR_INNER_TEXT, json!({ "selector": self.selector }))
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    /// Poll until at least one element matches or `timeout` elapses
    ///
    /// Evaluation errors count as "not yet"; the wait never raises.
    pub async fn wait_for(&self, timeout: Duration) -> WaitOutcome {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(n) = self.count().await
                && n > 0
            {
                return WaitOutcome::Found;
            }
            if Instant::now() >= deadline {
                tracing::trace!("wait for '{}' timed out after {:?}", self.selector, timeout);
                return WaitOutcome::TimedOut;
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }
}

/// Wait for `document.readyState == "complete"`, the closest CDP-agnostic
/// stand-in for a quiet network. Never raises.
pub async fn wait_for_load_state<P: BrowserPage>(page: &P, timeout: Duration) -> WaitOutcome {
    let deadline = Instant::now() + timeout;
    loop {
        if let Ok(state) = page.evaluate(&DOCUMENT_READY_STATE, json!({})).await
            && state.as_str() == Some("complete")
        {
            return WaitOutcome::Found;
        }
        if Instant::now() >= deadline {
            return WaitOutcome::TimedOut;
        }
        tokio::time::sleep(WAIT_POLL_INTERVAL).await;
    }
}
