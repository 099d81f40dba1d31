//! Scripted in-memory browser for the web search test suite
//!
//! `FakeContext` hands out `FakePage`s that answer every `PageScript` by name
//! from a table of `FakeSite`s keyed by URL prefix. Nothing here touches a real
//! browser, so the tests run under paused tokio time.

use anyhow::{Result, bail};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

use kodegen_tools_websearch::browser::{BrowserContext, BrowserPage, PageScript};
use kodegen_tools_websearch::state_cache::StorageState;

/// Canned behaviour of every URL under one prefix
#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    pub redirect_to: Option<String>,
    pub title: String,
    /// `(selector, innerText)`; each listed selector matches one element
    pub elements: Vec<(String, String)>,
    pub result_selector: Option<String>,
    /// `(title, href)` of result anchors
    pub result_links: Vec<(String, String)>,
    /// `(text, link density)` of structural containers
    pub blocks: Vec<(String, f64)>,
    pub github: Option<Value>,
    pub body: String,
    pub html: Option<String>,
    /// Challenge widget visible until this instant
    pub captcha_until: Option<Instant>,
    pub fail_navigation: bool,
}

#[allow(dead_code)]
impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(mut self, selector: &str, text: impl Into<String>) -> Self {
        self.elements.push((selector.to_string(), text.into()));
        self
    }

    pub fn results(mut self, selector: &str, links: Vec<(String, String)>) -> Self {
        self.result_selector = Some(selector.to_string());
        self.result_links = links;
        self
    }

    pub fn block(mut self, text: impl Into<String>, ld: f64) -> Self {
        self.blocks.push((text.into(), ld));
        self
    }

    pub fn github(mut self, thread: Value) -> Self {
        self.github = Some(thread);
        self
    }

    pub fn body(mut self, text: impl Into<String>) -> Self {
        self.body = text.into();
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn redirect(mut self, url: &str) -> Self {
        self.redirect_to = Some(url.to_string());
        self
    }

    pub fn captcha_until(mut self, until: Instant) -> Self {
        self.captcha_until = Some(until);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    fn captcha_active(&self) -> bool {
        self.captcha_until.is_some_and(|until| Instant::now() < until)
    }

    /// Comma-separated selector lists match when any part is present
    fn count(&self, selector: &str) -> usize {
        if self.captcha_active() && selector == ".captcha" {
            return 1;
        }
        if self.result_selector.as_deref() == Some(selector) {
            return self.result_links.len();
        }
        if self.elements.iter().any(|(s, _)| s == selector) {
            return 1;
        }
        selector
            .split(',')
            .map(str::trim)
            .filter(|part| self.elements.iter().any(|(s, _)| s == part))
            .count()
    }

    fn inner_text(&self, selector: &str) -> Option<String> {
        self.elements
            .iter()
            .find(|(s, _)| s == selector)
            .map(|(_, text)| text.clone())
    }
}

/// Something a fake page did, in the order it happened
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Opened,
    Navigated(String),
    BroughtToFront { url: String, at: Instant },
    Closed(String),
}

#[derive(Default)]
struct Shared {
    sites: Mutex<Vec<(String, FakeSite)>>,
    events: Mutex<Vec<Event>>,
    /// `(open now, most open at once)`
    open_pages: Mutex<(usize, usize)>,
    storage: Mutex<StorageState>,
}

impl Shared {
    fn site_for(&self, url: &str) -> FakeSite {
        let sites = self.sites.lock().unwrap();
        sites
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, site)| site.clone())
            .unwrap_or_default()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[derive(Clone, Default)]
pub struct FakeContext {
    shared: Arc<Shared>,
}

#[allow(dead_code)]
impl FakeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn site(self, prefix: &str, site: FakeSite) -> Self {
        self.shared.sites.lock().unwrap().push((prefix.to_string(), site));
        self
    }

    pub fn with_storage(self, state: StorageState) -> Self {
        *self.shared.storage.lock().unwrap() = state;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.shared.events.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Navigated(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn brought_to_front(&self) -> Vec<(String, Instant)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::BroughtToFront { url, at } => Some((url, at)),
                _ => None,
            })
            .collect()
    }

    pub fn max_open_pages(&self) -> usize {
        self.shared.open_pages.lock().unwrap().1
    }

    pub fn open_pages(&self) -> usize {
        self.shared.open_pages.lock().unwrap().0
    }
}

impl BrowserContext for FakeContext {
    type Page = FakePage;

    async fn new_page(&self) -> Result<FakePage> {
        {
            let mut open = self.shared.open_pages.lock().unwrap();
            open.0 += 1;
            open.1 = open.1.max(open.0);
        }
        self.shared.record(Event::Opened);
        Ok(FakePage {
            shared: Arc::clone(&self.shared),
            url: Arc::new(Mutex::new("about:blank".to_string())),
        })
    }

    async fn storage_state(&self) -> Result<StorageState> {
        Ok(self.shared.storage.lock().unwrap().clone())
    }
}

pub struct FakePage {
    shared: Arc<Shared>,
    url: Arc<Mutex<String>>,
}

impl FakePage {
    fn current_url(&self) -> String {
        self.url.lock().unwrap().clone()
    }

    fn site(&self) -> FakeSite {
        self.shared.site_for(&self.current_url())
    }
}

impl BrowserPage for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        let site = self.shared.site_for(url);
        if site.fail_navigation {
            bail!("net::ERR_CONNECTION_REFUSED at {url}");
        }
        self.shared.record(Event::Navigated(url.to_string()));
        *self.url.lock().unwrap() = site.redirect_to.unwrap_or_else(|| url.to_string());
        Ok(())
    }

    async fn url(&self) -> Result<String> {
        Ok(self.current_url())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.site().title)
    }

    async fn evaluate(&self, script: &PageScript, args: Value) -> Result<Value> {
        let site = self.site();
        let selector = args["selector"].as_str().unwrap_or_default();
        let value = match script.name {
            "selector_count" => json!(site.count(selector)),
            "selector_inner_text" => site.inner_text(selector).map_or(Value::Null, Value::String),
            "document_ready_state" => json!("complete"),
            "body_text" => json!(site.body),
            "nth_result_link" => {
                let index = args["index"].as_u64().unwrap_or(u64::MAX) as usize;
                site.result_links
                    .get(index)
                    .map_or(Value::Null, |(title, href)| json!({ "title": title, "href": href }))
            }
            "micro_scroll" | "auto_scroll" => json!(true),
            "main_block_candidates" => Value::Array(
                site.blocks
                    .iter()
                    .map(|(text, ld)| json!({ "text": text, "len": text.chars().count(), "ld": ld }))
                    .collect(),
            ),
            "github_issue" => match site.github {
                Some(thread) => thread,
                None => bail!("not a GitHub thread"),
            },
            "local_storage_snapshot" => json!({ "origin": self.current_url(), "localStorage": [] }),
            other => bail!("unscripted page script '{other}'"),
        };
        Ok(value)
    }

    async fn content(&self) -> Result<String> {
        Ok(self
            .site()
            .html
            .unwrap_or_else(|| "<html><head></head><body></body></html>".to_string()))
    }

    async fn bring_to_front(&self) -> Result<()> {
        self.shared.record(Event::BroughtToFront {
            url: self.current_url(),
            at: Instant::now(),
        });
        Ok(())
    }

    async fn close(self) -> Result<()> {
        {
            let mut open = self.shared.open_pages.lock().unwrap();
            open.0 = open.0.saturating_sub(1);
        }
        self.shared.record(Event::Closed(self.current_url()));
        Ok(())
    }
}

/// Prose with real paragraph structure, long enough to clear every threshold
#[allow(dead_code)]
pub fn article_text(topic: &str, paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| {
            format!(
                "Section {i} on {topic} walks through how the runtime schedules work across threads, \
                 why tasks yield at await points and what that means for latency under load."
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `count` result anchors pointing at `https://{host}/page-{i}`
#[allow(dead_code)]
pub fn result_links(host: &str, count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| (format!("Result {i} from {host}"), format!("https://{host}/page-{i}")))
        .collect()
}

#[allow(dead_code)]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
