//! Crawl stage
//!
//! Fans search hits out over fresh pages of the shared browser context and
//! runs the extraction pipeline on each one.

pub mod orchestrator;
pub mod page_enhancer;
pub mod page_timeout;

pub use orchestrator::crawl_hits;
pub use page_enhancer::enhance_page;
pub use page_timeout::with_page_timeout;
