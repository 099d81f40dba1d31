//! Configuration for web search runs
//!
//! `WebSearchConfig` plus its validating builder. Defaults match the service
//! defaults; `HEADLESS` and `DEBUG` environment variables can override them.

pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

pub use builder::WebSearchConfigBuilder;
pub use methods::{DEBUG_ENV, HEADLESS_ENV};
pub use types::{WebSearchConfig, default_cache_dir};
