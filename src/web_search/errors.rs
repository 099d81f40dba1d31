//! Error types for web search operations
//!
//! Only configuration problems abort a search run. Page, engine and CAPTCHA
//! failures are contained where they happen and never reach this type.

use thiserror::Error;

pub type WebSearchResult<T> = Result<T, WebSearchError>;

#[derive(Debug, Error)]
pub enum WebSearchError {
    /// None of the requested engine names matched a registered adapter
    #[error("No engines selected (requested: {requested:?})")]
    NoEnginesSelected { requested: Vec<String> },

    #[error("Search query cannot be empty or whitespace-only")]
    EmptyQuery,

    #[error("Search query is too long ({len} characters, maximum {max})")]
    QueryTooLong { len: usize, max: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Browser could not be launched or driven at the context level
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<anyhow::Error> for WebSearchError {
    fn from(error: anyhow::Error) -> Self {
        WebSearchError::Browser(format!("{error:#}"))
    }
}

impl WebSearchError {
    /// Whether the error stems from caller input rather than the environment
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            WebSearchError::NoEnginesSelected { .. }
                | WebSearchError::EmptyQuery
                | WebSearchError::QueryTooLong { .. }
                | WebSearchError::InvalidConfig(_)
        )
    }
}
