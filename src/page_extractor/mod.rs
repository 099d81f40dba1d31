//! Content extraction for crawled result pages
//!
//! Several strategies each propose a candidate text for the page; candidates
//! are scored for quality, weighted by how much each strategy is trusted, and
//! the best one becomes the page's result.

pub mod article;
pub mod extractors;
pub mod js_scripts;
pub mod pipeline;
pub mod schema;
pub mod scoring;
pub mod site_selectors;
pub mod text;

pub use article::{ReadableArticle, extract_readable};
pub use extractors::{BlockCandidate, GithubThread, select_main_block};
pub use pipeline::{ExtractOptions, extract_page};
pub use schema::{CandidateScore, ExtractionMethod, PageResult};
pub use scoring::{RankedCandidate, count_noise, rank_candidates, score_text};
pub use site_selectors::{match_site_selectors, settle_target};
pub use text::{clean_page_text, html_to_text, normalize_text};
