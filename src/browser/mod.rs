//! Browser abstraction consumed by the search and extraction stages
//!
//! The dispatcher and the extraction pipeline never talk to chromiumoxide
//! directly. They need "a context that opens pages" and "a page that navigates,
//! evaluates scripts and reports its state", nothing more. [`ChromiumContext`]
//! is the production implementation; tests drive the same code through a
//! scripted in-memory context.
//!
//! In-page logic is modelled as [`PageScript`]: an opaque remote procedure with
//! a name, a JS function source, one JSON argument in and one JSON value out.

pub mod chromium;
pub mod launch;
pub mod locator;
pub mod wrapper;

pub use chromium::{ChromiumContext, ChromiumPage};
pub use launch::{find_browser_executable, launch_browser};
pub use locator::{Locator, WaitOutcome, wait_for_load_state};
pub use wrapper::{BrowserWrapper, move_window_offscreen};

use anyhow::Result;
use serde_json::Value;
use std::future::Future;

use crate::state_cache::StorageState;

/// A JavaScript function evaluated inside the page
///
/// `source` is a function expression (`(args) => ...` or `async (args) => ...`)
/// invoked with a single JSON argument. The return value must be
/// JSON-serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageScript {
    /// Stable identifier, used for logging and by scripted test pages
    pub name: &'static str,
    pub source: &'static str,
}

impl PageScript {
    #[must_use]
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self { name, source }
    }

    /// Expression that calls the function with `args`
    #[must_use]
    pub fn invocation(&self, args: &Value) -> String {
        format!("({})({})", self.source.trim(), args)
    }
}

/// One browser tab
pub trait BrowserPage: Send + Sync {
    /// Navigate and wait for the navigation to commit and load
    fn goto(&self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// Current URL after redirects
    fn url(&self) -> impl Future<Output = Result<String>> + Send;

    fn title(&self) -> impl Future<Output = Result<String>> + Send;

    /// Run `script` in the page with `args` and return its JSON result
    fn evaluate(
        &self,
        script: &PageScript,
        args: Value,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// Full serialized HTML of the current document
    fn content(&self) -> impl Future<Output = Result<String>> + Send;

    /// Activate the tab so a human operator sees it
    fn bring_to_front(&self) -> impl Future<Output = Result<()>> + Send;

    fn close(self) -> impl Future<Output = Result<()>> + Send;
}

/// Shared browser context for one search invocation
///
/// Pages opened from the same context share cookies and storage.
pub trait BrowserContext: Send + Sync {
    type Page: BrowserPage;

    fn new_page(&self) -> impl Future<Output = Result<Self::Page>> + Send;

    /// Snapshot of cookies and per-origin local storage across all open pages
    fn storage_state(&self) -> impl Future<Output = Result<StorageState>> + Send;
}
