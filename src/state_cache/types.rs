//! Persisted browser-state shapes
//!
//! The on-disk format mirrors what a browser context reports as its storage
//! state: a list of cookies plus per-origin local storage. Unknown cookie
//! attributes are carried through untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cookies and local storage captured from a browser context
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageState {
    #[serde(default)]
    pub cookies: Vec<StoredCookie>,
    #[serde(default)]
    pub origins: Vec<OriginState>,
}

impl StorageState {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty() && self.origins.is_empty()
    }

    /// Append another state's cookies and origins
    pub fn merge(&mut self, other: StorageState) {
        self.cookies.extend(other.cookies);
        self.origins.extend(other.origins);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
    /// Seconds since the epoch; `-1` for session cookies
    #[serde(default = "session_expiry")]
    pub expires: f64,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn session_expiry() -> f64 {
    -1.0
}

impl StoredCookie {
    /// Session cookie scoped to `domain` with path `/`
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: default_cookie_path(),
            expires: session_expiry(),
            http_only: false,
            secure: false,
            same_site: None,
            extra: Map::new(),
        }
    }
}

/// Local storage of one origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginState {
    pub origin: String,
    #[serde(default)]
    pub local_storage: Vec<StorageEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

/// Metadata record for one engine's cached state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

impl CacheEntry {
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Summary of one engine's cache slot, as reported by `cache_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheInfo {
    pub exists: bool,
    pub is_valid: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_cookie_fields_survive_a_round_trip() {
        let raw = r#"{"name":"MUID","value":"abc","domain":".bing.com","path":"/",
            "expires":1893456000,"httpOnly":true,"secure":true,"sameSite":"None","priority":"Medium"}"#;
        let cookie: StoredCookie = serde_json::from_str(raw).unwrap();
        assert!(cookie.http_only);
        assert_eq!(cookie.same_site.as_deref(), Some("None"));
        assert_eq!(cookie.extra.get("priority"), Some(&Value::from("Medium")));

        let back = serde_json::to_value(&cookie).unwrap();
        assert_eq!(back["priority"], "Medium");
        assert_eq!(back["httpOnly"], true);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let state: StorageState = serde_json::from_str("{}").unwrap();
        assert!(state.is_empty());
    }
}
