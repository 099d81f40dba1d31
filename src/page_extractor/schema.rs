use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::char_len;

/// Strategy that produced a candidate text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    GithubIssue,
    Selectors,
    MainBlock,
    Readability,
    Body,
}

impl ExtractionMethod {
    /// Trust weight applied to the raw quality score
    #[must_use]
    pub fn prior(self) -> f64 {
        match self {
            ExtractionMethod::GithubIssue => 1.55,
            ExtractionMethod::Selectors => 1.20,
            ExtractionMethod::MainBlock => 1.10,
            ExtractionMethod::Readability => 1.00,
            ExtractionMethod::Body => 0.90,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionMethod::GithubIssue => "github_issue",
            ExtractionMethod::Selectors => "selectors",
            ExtractionMethod::MainBlock => "main_block",
            ExtractionMethod::Readability => "readability",
            ExtractionMethod::Body => "body",
        }
    }

    /// Minimum text length (exclusive) for a result to count as good
    #[must_use]
    pub fn good_length_threshold(self) -> usize {
        match self {
            ExtractionMethod::GithubIssue => 160,
            _ => 256,
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted score of one attempted strategy, kept for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub method: ExtractionMethod,
    pub score: f64,
    /// Candidate text length in characters
    pub length: usize,
}

/// Outcome of extracting one search hit
///
/// A present `error` makes the result unusable regardless of the other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub engine: String,
    pub title: String,
    pub url: String,
    pub final_url: Option<String>,
    pub page_title: Option<String>,
    pub method: Option<ExtractionMethod>,
    pub score: Option<f64>,
    pub text: String,
    pub candidates: Vec<CandidateScore>,
    pub error: Option<String>,
}

impl PageResult {
    /// Terminal error result for a hit
    #[must_use]
    pub fn failed(engine: &str, title: &str, url: &str, error: impl Into<String>) -> Self {
        Self {
            engine: engine.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            final_url: None,
            page_title: None,
            method: None,
            score: None,
            text: String::new(),
            candidates: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// No error and text longer than the method's threshold
    #[must_use]
    pub fn is_good(&self) -> bool {
        if self.error.is_some() {
            return false;
        }
        let threshold = self
            .method
            .map_or(ExtractionMethod::Body.good_length_threshold(), ExtractionMethod::good_length_threshold);
        char_len(&self.text) > threshold
    }

    /// URL after redirects, or the original hit URL
    #[must_use]
    pub fn effective_url(&self) -> &str {
        self.final_url.as_deref().unwrap_or(&self.url)
    }

    /// Page's own title, or the search engine's anchor text
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.page_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.title)
    }
}
