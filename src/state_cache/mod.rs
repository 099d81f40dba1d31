//! Browser-state cache
//!
//! Lets consecutive search runs reuse engine cookies so verification
//! challenges are not presented on every invocation.

pub mod errors;
pub mod manager;
pub mod types;

pub use errors::{StateCacheError, StateCacheResult};
pub use manager::{ENGINE_DOMAINS, StateCacheManager, allowed_domains, filter_state_for_engine};
pub use types::{CacheEntry, CacheInfo, OriginState, StorageEntry, StorageState, StoredCookie};
