//! Data structures for the search stage

use serde::{Deserialize, Serialize};

/// One result anchor collected from a search engine page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Adapter that produced the hit
    pub engine: String,

    /// Anchor text, whitespace-collapsed by the adapter's cleaner
    pub title: String,

    /// Absolute target URL as shown by the engine (may be a redirect link)
    pub url: String,
}

impl SearchHit {
    #[must_use]
    pub fn new(engine: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Drop hits whose URL was already seen, keeping first-seen order
#[must_use]
pub fn dedup_hits(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = std::collections::HashSet::new();
    hits.into_iter()
        .filter(|h| seen.insert(h.url.clone()))
        .collect()
}
