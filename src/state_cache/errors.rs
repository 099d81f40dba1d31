//! Error types for the state cache write path
//!
//! The read path never surfaces errors (misses self-heal); only explicit
//! saves report failures, and `save_context_state` folds those into a bool.

use std::time::Duration;
use thiserror::Error;

pub type StateCacheResult<T> = Result<T, StateCacheError>;

#[derive(Debug, Error)]
pub enum StateCacheError {
    #[error("State cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State cache serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("State TTL {0:?} is out of range")]
    TtlOutOfRange(Duration),
}
