//! chromiumoxide-backed browser context and pages

use anyhow::{Context, Result};
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

use super::{BrowserContext, BrowserPage, PageScript};
use crate::crawl_engine::page_enhancer::enhance_page;
use crate::page_extractor::js_scripts::{LOCAL_STORAGE_SNAPSHOT, WEBDRIVER_MASK};
use crate::state_cache::{OriginState, StorageState, StoredCookie};

/// The browser's default context, optionally seeded from a cached state
pub struct ChromiumContext<'a> {
    browser: &'a Browser,
    /// Replays cached localStorage on matching origins; `None` when nothing cached
    storage_restore: Option<String>,
}

impl<'a> ChromiumContext<'a> {
    /// Wrap `browser`, restoring cookies now and localStorage on each new page
    pub async fn open(browser: &'a Browser, state: Option<&StorageState>) -> Result<Self> {
        let Some(state) = state.filter(|s| !s.is_empty()) else {
            return Ok(Self {
                browser,
                storage_restore: None,
            });
        };

        let cookies: Vec<CookieParam> = state.cookies.iter().filter_map(cookie_param).collect();
        if !cookies.is_empty() {
            let restored = cookies.len();
            browser
                .set_cookies(cookies)
                .await
                .context("Failed to restore cached cookies")?;
            tracing::info!("Restored {restored} cached cookie(s)");
        }

        Ok(Self {
            browser,
            storage_restore: local_storage_restore_script(&state.origins),
        })
    }
}

/// CDP cookie from a stored cookie; `None` for malformed entries
fn cookie_param(cookie: &StoredCookie) -> Option<CookieParam> {
    let mut raw = Map::new();
    raw.insert("name".into(), json!(cookie.name));
    raw.insert("value".into(), json!(cookie.value));
    raw.insert("domain".into(), json!(cookie.domain));
    raw.insert("path".into(), json!(cookie.path));
    raw.insert("secure".into(), json!(cookie.secure));
    raw.insert("httpOnly".into(), json!(cookie.http_only));
    if let Some(same_site) = &cookie.same_site {
        raw.insert("sameSite".into(), json!(same_site));
    }
    if cookie.expires > 0.0 {
        raw.insert("expires".into(), json!(cookie.expires));
    }
    match serde_json::from_value(Value::Object(raw)) {
        Ok(param) => Some(param),
        Err(e) => {
            tracing::debug!("Skipping cached cookie '{}': {e}", cookie.name);
            None
        }
    }
}

/// New-document script that seeds localStorage for the cached origins
///
/// Keys the page has already written are left alone.
fn local_storage_restore_script(origins: &[OriginState]) -> Option<String> {
    let by_origin: BTreeMap<&str, Vec<(&str, &str)>> = origins
        .iter()
        .filter(|o| !o.local_storage.is_empty())
        .map(|o| {
            let items = o
                .local_storage
                .iter()
                .map(|e| (e.name.as_str(), e.value.as_str()))
                .collect();
            (o.origin.as_str(), items)
        })
        .collect();
    if by_origin.is_empty() {
        return None;
    }

    let data = serde_json::to_string(&by_origin).ok()?;
    Some(format!(
        r#"(() => {{
    const items = ({data})[location.origin];
    if (!items) return;
    try {{
        for (const [k, v] of items) {{
            if (localStorage.getItem(k) === null) localStorage.setItem(k, v);
        }}
    }} catch (e) {{}}
}})();"#
    ))
}

impl BrowserContext for ChromiumContext<'_> {
    type Page = ChromiumPage;

    async fn new_page(&self) -> Result<ChromiumPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to open tab")?;

        let mut scripts = vec![WEBDRIVER_MASK];
        if let Some(restore) = &self.storage_restore {
            scripts.push(restore.as_str());
        }
        enhance_page(&page, &scripts).await?;

        Ok(ChromiumPage { page })
    }

    async fn storage_state(&self) -> Result<StorageState> {
        let mut state = StorageState::default();

        for cookie in self.browser.get_cookies().await.context("Failed to read cookies")? {
            match serde_json::to_value(&cookie).and_then(serde_json::from_value::<StoredCookie>) {
                Ok(stored) => state.cookies.push(stored),
                Err(e) => tracing::debug!("Unreadable browser cookie: {e}"),
            }
        }

        let pages = self.browser.pages().await.context("Failed to list tabs")?;
        for page in pages {
            let page = ChromiumPage { page };
            let snapshot = match page.evaluate(&LOCAL_STORAGE_SNAPSHOT, json!({})).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::debug!("Skipping tab in storage snapshot: {e:#}");
                    continue;
                }
            };
            let Ok(origin) = serde_json::from_value::<OriginState>(snapshot) else {
                continue;
            };
            let is_web = origin.origin.starts_with("http://") || origin.origin.starts_with("https://");
            if is_web
                && !origin.local_storage.is_empty()
                && !state.origins.iter().any(|o| o.origin == origin.origin)
            {
                state.origins.push(origin);
            }
        }

        Ok(state)
    }
}

/// One chromiumoxide tab
#[derive(Clone)]
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    /// Underlying chromiumoxide page
    #[must_use]
    pub fn inner(&self) -> &Page {
        &self.page
    }
}

impl BrowserPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    async fn url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    async fn evaluate(&self, script: &PageScript, args: Value) -> Result<Value> {
        let params = EvaluateParams::builder()
            .expression(script.invocation(&args))
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(anyhow::Error::msg)?;
        let result = self
            .page
            .evaluate_expression(params)
            .await
            .with_context(|| format!("Script '{}' failed", script.name))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn content(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }

    async fn bring_to_front(&self) -> Result<()> {
        self.page.bring_to_front().await?;
        Ok(())
    }

    async fn close(self) -> Result<()> {
        self.page.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_cache::StorageEntry;

    #[test]
    fn restore_script_embeds_only_non_empty_origins() {
        let origins = vec![
            OriginState {
                origin: "https://www.bing.com".into(),
                local_storage: vec![StorageEntry {
                    name: "theme".into(),
                    value: "dark".into(),
                }],
            },
            OriginState {
                origin: "https://duckduckgo.com".into(),
                local_storage: vec![],
            },
        ];
        let script = local_storage_restore_script(&origins).unwrap();
        assert!(script.contains(r#"{"https://www.bing.com":[["theme","dark"]]}"#));
        assert!(!script.contains("duckduckgo"));
        assert!(local_storage_restore_script(&origins[1..]).is_none());
    }

    #[test]
    fn session_cookies_omit_expiry() {
        let cookie = StoredCookie::new("SID", "abc", ".bing.com");
        let param = cookie_param(&cookie).unwrap();
        assert_eq!(param.name, "SID");
        assert!(param.expires.is_none());
    }
}
