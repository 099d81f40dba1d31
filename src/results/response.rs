//! Caller-facing projection of aggregated results

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

use crate::page_extractor::{ExtractionMethod, PageResult};

/// Output rendering requested by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    #[serde(rename = "md")]
    Markdown,
}

impl FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "md" | "markdown" => Ok(ResponseFormat::Markdown),
            other => Err(format!("unknown format '{other}' (expected json or md)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchHit {
    pub title: String,
    pub url: String,
    pub engine: String,
    pub content: String,
    pub method: Option<ExtractionMethod>,
    pub score: Option<f64>,
}

impl From<&PageResult> for WebSearchHit {
    fn from(r: &PageResult) -> Self {
        Self {
            title: r.display_title().to_string(),
            url: r.effective_url().to_string(),
            engine: r.engine.clone(),
            content: r.text.clone(),
            method: r.method,
            score: r.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<WebSearchHit>,
}

impl WebSearchResponse {
    #[must_use]
    pub fn new(query: &str, pages: &[PageResult]) -> Self {
        let results: Vec<WebSearchHit> = pages.iter().map(WebSearchHit::from).collect();
        Self {
            query: query.to_string(),
            count: results.len(),
            results,
        }
    }

    /// Pretty JSON or Markdown text
    pub fn render(&self, format: ResponseFormat) -> serde_json::Result<String> {
        match format {
            ResponseFormat::Json => serde_json::to_string_pretty(self),
            ResponseFormat::Markdown => Ok(self.to_markdown()),
        }
    }

    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Search results: {}\n", self.query);
        let _ = writeln!(out, "Found {} results\n", self.count);
        for (i, hit) in self.results.iter().enumerate() {
            let _ = writeln!(out, "## {}. {}", i + 1, hit.title);
            let _ = writeln!(out, "**Source**: {} | **URL**: {}", hit.engine, hit.url);
            if let Some(method) = hit.method {
                let score = hit.score.map_or_else(|| "-".to_string(), |s| format!("{s:.2}"));
                let _ = writeln!(out, "**Method**: {method} | **Score**: {score}");
            }
            let _ = writeln!(out, "\n{}\n", hit.content);
            let _ = writeln!(out, "---\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageResult {
        PageResult {
            final_url: Some("https://tokio.rs/tokio/tutorial".into()),
            page_title: Some("Tutorial | Tokio".into()),
            method: Some(ExtractionMethod::Selectors),
            score: Some(61.234),
            text: "Tokio is an asynchronous runtime.".into(),
            error: None,
            ..PageResult::failed("bing", "Tokio tutorial", "https://www.bing.com/ck/a?u=x", "")
        }
    }

    #[test]
    fn json_projection_prefers_page_title_and_final_url() {
        let response = WebSearchResponse::new("tokio", &[page()]);
        let value: serde_json::Value =
            serde_json::from_str(&response.render(ResponseFormat::Json).unwrap()).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["results"][0]["title"], "Tutorial | Tokio");
        assert_eq!(value["results"][0]["url"], "https://tokio.rs/tokio/tutorial");
        assert_eq!(value["results"][0]["method"], "selectors");
        assert_eq!(value["results"][0]["content"], "Tokio is an asynchronous runtime.");
    }

    #[test]
    fn markdown_lists_each_result() {
        let md = WebSearchResponse::new("tokio", &[page()]).to_markdown();
        assert!(md.starts_with("# Search results: tokio\n\nFound 1 results\n"));
        assert!(md.contains("## 1. Tutorial | Tokio\n**Source**: bing | **URL**: https://tokio.rs/tokio/tutorial\n"));
        assert!(md.contains("**Method**: selectors | **Score**: 61.23"));
        assert!(md.contains("\nTokio is an asynchronous runtime.\n"));
        assert!(md.trim_end().ends_with("---"));
    }

    #[test]
    fn format_parses_aliases() {
        assert_eq!("md".parse::<ResponseFormat>(), Ok(ResponseFormat::Markdown));
        assert_eq!("JSON".parse::<ResponseFormat>(), Ok(ResponseFormat::Json));
        assert!("xml".parse::<ResponseFormat>().is_err());
    }
}
