//! Crawl stage orchestration
//!
//! Every search hit gets its own extraction pipeline; a semaphore bounds how
//! many tabs are open at once. Results come back in hit order and there is
//! exactly one result per hit, failures included.

use futures::future::join_all;
use log::info;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::browser::BrowserContext;
use crate::page_extractor::{ExtractOptions, PageResult, extract_page};
use crate::web_search::SearchHit;

/// Extract every hit with at most `concurrency` pages open
pub async fn crawl_hits<C: BrowserContext>(
    context: &C,
    hits: &[SearchHit],
    concurrency: usize,
    options: &ExtractOptions,
) -> Vec<PageResult> {
    let start = Instant::now();
    let semaphore = Semaphore::new(concurrency.max(1));
    info!("Crawling {} page(s), {} at a time", hits.len(), concurrency.max(1));

    let results = join_all(
        hits.iter()
            .map(|hit| extract_page(context, &semaphore, hit, options)),
    )
    .await;

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    info!(
        "Crawl stage finished in {:.1}s: {} ok, {} failed",
        start.elapsed().as_secs_f64(),
        results.len() - failed,
        failed
    );
    results
}
