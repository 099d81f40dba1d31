//! Result aggregation

use std::collections::HashSet;

use crate::page_extractor::{PageResult, clean_page_text};
use crate::utils::CLEAN_TEXT_MAX_CHARS;

/// Re-flow every result's text into clean paragraphs
pub fn clean_results(results: &mut [PageResult]) {
    for result in results {
        result.text = clean_page_text(&result.text, CLEAN_TEXT_MAX_CHARS);
    }
}

/// Keep good results, deduplicated by effective URL in first-seen order
#[must_use]
pub fn aggregate(results: Vec<PageResult>) -> Vec<PageResult> {
    let mut seen: HashSet<String> = HashSet::new();
    results
        .into_iter()
        .filter(PageResult::is_good)
        .filter(|r| seen.insert(r.effective_url().to_string()))
        .collect()
}
