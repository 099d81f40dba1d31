//! Per-engine browser state cache
//!
//! One JSON file per engine (`{engine}_state.json`) plus a shared
//! `metadata.json` mapping engine names to [`CacheEntry`] timestamps.
//!
//! # Validity
//!
//! An entry is valid iff its metadata record exists, its state file exists
//! and `now < expires_at`. Everything else (missing file, corrupt JSON,
//! missing or corrupt metadata) is a cache miss and the slot is invalidated
//! on the spot. Callers never see cache I/O errors from the read path.
//!
//! # Locking
//!
//! Each engine gets its own lazily created async mutex guarding its state
//! file. Engines never contend with each other for state I/O. The shared
//! metadata file has a separate short-lived mutex held only for its
//! read-modify-write, so concurrent saves for different engines cannot lose
//! each other's records.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::errors::{StateCacheError, StateCacheResult};
use super::types::{CacheEntry, CacheInfo, OriginState, StorageState, StoredCookie};
use crate::browser::BrowserContext;
use crate::utils::{cookie_domain_matches, origin_matches};

const METADATA_FILE: &str = "metadata.json";

/// Domains whose cookies and origins may be persisted for each engine
///
/// Filtering at write time keeps one engine's credentials out of another
/// engine's slot when states are merged on load.
pub const ENGINE_DOMAINS: &[(&str, &[&str])] = &[
    ("bing", &["bing.com", "www.bing.com"]),
    ("duckduckgo", &["duckduckgo.com", "www.duckduckgo.com"]),
    ("baidu", &["baidu.com", "www.baidu.com"]),
    ("yandex", &["yandex.com", "www.yandex.com", "yandex.ru", "www.yandex.ru"]),
];

/// Whitelisted domains for `engine` (empty for unknown engines)
#[must_use]
pub fn allowed_domains(engine: &str) -> &'static [&'static str] {
    ENGINE_DOMAINS
        .iter()
        .find(|(name, _)| *name == engine)
        .map_or(&[], |(_, domains)| *domains)
}

/// Keep only the cookies and origins belonging to `engine`'s whitelist
#[must_use]
pub fn filter_state_for_engine(engine: &str, state: &StorageState) -> StorageState {
    let allowed = allowed_domains(engine);

    let cookies: Vec<StoredCookie> = state
        .cookies
        .iter()
        .filter(|c| allowed.iter().any(|d| cookie_domain_matches(&c.domain, d)))
        .cloned()
        .collect();

    let origins: Vec<OriginState> = state
        .origins
        .iter()
        .filter(|o| allowed.iter().any(|d| origin_matches(&o.origin, d)))
        .cloned()
        .collect();

    StorageState { cookies, origins }
}

/// Disk-backed, TTL-bounded store of per-engine browser session state
pub struct StateCacheManager {
    cache_dir: PathBuf,
    ttl: Duration,
    engine_locks: DashMap<String, Arc<Mutex<()>>>,
    metadata_lock: Mutex<()>,
}

impl StateCacheManager {
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ttl,
            engine_locks: DashMap::new(),
            metadata_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Path of the state file for `engine`
    #[must_use]
    pub fn state_path(&self, engine: &str) -> PathBuf {
        self.cache_dir.join(format!("{engine}_state.json"))
    }

    fn metadata_path(&self) -> PathBuf {
        self.cache_dir.join(METADATA_FILE)
    }

    fn engine_lock(&self, engine: &str) -> Arc<Mutex<()>> {
        self.engine_locks
            .entry(engine.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Load the cached state for `engine`, or `None` on any kind of miss
    ///
    /// A hit refreshes the entry's `last_used` timestamp. An expired or
    /// unreadable entry is deleted before returning `None`.
    pub async fn load_state(&self, engine: &str) -> Option<StorageState> {
        let lock = self.engine_lock(engine);
        let _guard = lock.lock().await;

        let now = Utc::now();
        let path = self.state_path(engine);
        let entry = self.read_metadata().await.remove(engine);

        let valid = match entry {
            Some(entry) => !entry.is_expired_at(now) && tokio::fs::try_exists(&path).await.unwrap_or(false),
            None => false,
        };
        if !valid {
            debug!("No valid cached state for {engine}");
            self.invalidate_locked(engine).await;
            return None;
        }

        let state = match read_state_file(&path).await {
            Ok(state) => state,
            Err(e) => {
                warn!("Cached state for {engine} is unreadable, invalidating: {e}");
                self.invalidate_locked(engine).await;
                return None;
            }
        };

        if let Err(e) = self.touch(engine, now).await {
            warn!("Failed to update last_used for {engine}: {e}");
        }

        info!(
            "Loaded cached state for {engine} ({} cookies, {} origins)",
            state.cookies.len(),
            state.origins.len()
        );
        Some(state)
    }

    /// Persist `state` for `engine` after filtering it to the engine's domains
    ///
    /// Resets `created_at`, `expires_at = now + ttl` and `last_used`.
    pub async fn save_state(&self, engine: &str, state: &StorageState) -> StateCacheResult<()> {
        let lock = self.engine_lock(engine);
        let _guard = lock.lock().await;

        let filtered = filter_state_for_engine(engine, state);
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let body = serde_json::to_vec_pretty(&filtered)?;
        write_atomic(&self.state_path(engine), &body).await?;

        let now = Utc::now();
        let ttl = chrono::Duration::from_std(self.ttl).map_err(|_| StateCacheError::TtlOutOfRange(self.ttl))?;
        let entry = CacheEntry {
            created_at: now,
            expires_at: now + ttl,
            last_used: now,
        };
        self.update_metadata(|m| {
            m.insert(engine.to_string(), entry);
        })
        .await?;

        info!(
            "Saved state for {engine} ({} cookies, {} origins kept)",
            filtered.cookies.len(),
            filtered.origins.len()
        );
        Ok(())
    }

    /// Capture the context's storage state and persist it for `engine`
    ///
    /// Returns `false` (after logging) if either the capture or the write fails.
    pub async fn save_context_state<C: BrowserContext>(&self, context: &C, engine: &str) -> bool {
        let state = match context.storage_state().await {
            Ok(state) => state,
            Err(e) => {
                warn!("Failed to capture storage state for {engine}: {e:#}");
                return false;
            }
        };
        match self.save_state(engine, &state).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save state for {engine}: {e}");
                false
            }
        }
    }

    /// Load and union the cached states of every named engine
    ///
    /// Invalid engines are skipped. Returns `None` only when no engine had a
    /// valid state, so the caller can start a fresh cookie-less context.
    pub async fn load_merged_state<S: AsRef<str>>(&self, engines: &[S]) -> Option<StorageState> {
        let mut merged = StorageState::default();
        let mut any_valid = false;

        for engine in engines {
            if let Some(state) = self.load_state(engine.as_ref()).await {
                any_valid = true;
                merged.merge(state);
            }
        }

        any_valid.then_some(merged)
    }

    /// Delete `engine`'s state file and metadata record
    pub async fn invalidate(&self, engine: &str) {
        let lock = self.engine_lock(engine);
        let _guard = lock.lock().await;
        self.invalidate_locked(engine).await;
    }

    /// Caller must hold the engine lock
    async fn invalidate_locked(&self, engine: &str) {
        let path = self.state_path(engine);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!("Removed state file {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to delete state file for {engine}: {e}"),
        }

        if let Err(e) = self
            .update_metadata(|m| {
                m.remove(engine);
            })
            .await
        {
            warn!("Failed to drop metadata for {engine}: {e}");
        }
    }

    /// Invalidate every expired entry; returns how many were removed
    pub async fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let expired: Vec<String> = self
            .read_metadata()
            .await
            .into_iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(engine, _)| engine)
            .collect();

        for engine in &expired {
            self.invalidate(engine).await;
        }

        if !expired.is_empty() {
            info!("Cleaned up {} expired engine states", expired.len());
        }
        expired.len()
    }

    /// Per-engine summary of every slot recorded in the metadata file
    pub async fn cache_info(&self) -> BTreeMap<String, CacheInfo> {
        let now = Utc::now();
        let mut info = BTreeMap::new();
        for (engine, entry) in self.read_metadata().await {
            let exists = tokio::fs::try_exists(self.state_path(&engine))
                .await
                .unwrap_or(false);
            info.insert(
                engine,
                CacheInfo {
                    exists,
                    is_valid: !entry.is_expired_at(now),
                    created_at: entry.created_at,
                    expires_at: entry.expires_at,
                    last_used: entry.last_used,
                },
            );
        }
        info
    }

    async fn touch(&self, engine: &str, now: DateTime<Utc>) -> StateCacheResult<()> {
        self.update_metadata(|m| {
            if let Some(entry) = m.get_mut(engine) {
                entry.last_used = now;
            }
        })
        .await
    }

    /// Metadata map; a missing or corrupt file reads as empty
    async fn read_metadata(&self) -> BTreeMap<String, CacheEntry> {
        let _guard = self.metadata_lock.lock().await;
        self.read_metadata_unlocked().await
    }

    async fn read_metadata_unlocked(&self) -> BTreeMap<String, CacheEntry> {
        match tokio::fs::read(self.metadata_path()).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("Cache metadata is corrupt, treating as empty: {e}");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        }
    }

    async fn update_metadata<F>(&self, f: F) -> StateCacheResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, CacheEntry>),
    {
        let _guard = self.metadata_lock.lock().await;
        let mut metadata = self.read_metadata_unlocked().await;
        f(&mut metadata);

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let body = serde_json::to_vec_pretty(&metadata)?;
        write_atomic(&self.metadata_path(), &body).await
    }
}

async fn read_state_file(path: &Path) -> StateCacheResult<StorageState> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Write to a sibling temp file, then rename over the target
async fn write_atomic(path: &Path, body: &[u8]) -> StateCacheResult<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, body).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(o: &str) -> OriginState {
        OriginState {
            origin: o.to_string(),
            local_storage: Vec::new(),
        }
    }

    #[test]
    fn filter_keeps_only_whitelisted_domains() {
        let state = StorageState {
            cookies: vec![
                StoredCookie::new("MUID", "1", ".bing.com"),
                StoredCookie::new("SRCHD", "2", "www.bing.com"),
                StoredCookie::new("BAIDUID", "3", ".baidu.com"),
                StoredCookie::new("evil", "4", "bing.com.attacker.net"),
            ],
            origins: vec![
                origin("https://www.bing.com"),
                origin("https://duckduckgo.com"),
                origin("https://cn.bing.com"),
            ],
        };

        let filtered = filter_state_for_engine("bing", &state);
        let names: Vec<_> = filtered.cookies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["MUID", "SRCHD"]);
        assert_eq!(filtered.origins, vec![origin("https://www.bing.com")]);
    }

    #[test]
    fn unknown_engine_persists_nothing() {
        let state = StorageState {
            cookies: vec![StoredCookie::new("a", "b", "example.com")],
            origins: vec![origin("https://example.com")],
        };
        assert!(filter_state_for_engine("altavista", &state).is_empty());
    }

    #[test]
    fn yandex_covers_both_tlds() {
        assert!(allowed_domains("yandex").contains(&"yandex.ru"));
        assert!(allowed_domains("yandex").contains(&"www.yandex.com"));
    }
}
