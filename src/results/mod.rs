//! Aggregation of crawled pages into the externally visible result set

pub mod aggregate;
pub mod response;

pub use aggregate::{aggregate, clean_results};
pub use response::{ResponseFormat, WebSearchHit, WebSearchResponse};
