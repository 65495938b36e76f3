use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, fmt::Display, sync::Mutex};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Poster path lookup keyed by TMDb movie ID
    Poster(i64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Poster(external_id) => write!(f, "poster:{}", external_id),
        }
    }
}

/// Key/value store with per-entry TTL, holding JSON-encoded values
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the raw JSON stored under `key`, if present and not expired
    async fn get_raw(&self, key: &CacheKey) -> AppResult<Option<String>>;

    /// Stores a raw JSON value without waiting for the write to complete
    fn set_raw_in_background(&self, key: &CacheKey, value: String, ttl: u64);

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Retrieves a value from the cache by key
///
/// If the key exists, the value is deserialized and returned.
/// If the key does not exist, `None` is returned.
pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
    cache: &dyn CacheStore,
    key: &CacheKey,
) -> AppResult<Option<T>> {
    match cache.get_raw(key).await? {
        Some(json) => {
            let data = serde_json::from_str(&json)
                .map_err(|e| AppError::Internal(format!("Cache deserialization error: {}", e)))?;
            Ok(Some(data))
        }
        None => Ok(None),
    }
}

/// Serializes `value` and hands it to the cache without blocking
pub fn set_in_background<T: serde::Serialize>(
    cache: &dyn CacheStore,
    key: &CacheKey,
    value: &T,
    ttl: u64,
) {
    match serde_json::to_string(value) {
        Ok(json) => cache.set_raw_in_background(key, json, ttl),
        Err(e) => tracing::error!(error = %e, "Cache serialization error"),
    }
}

/// In-process cache used when no Redis URL is configured
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, DateTime<Utc>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl CacheStore for MemoryCache {
    async fn get_raw(&self, key: &CacheKey) -> AppResult<Option<String>> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Internal("Memory cache lock poisoned".to_string()))?;

        let key = key.to_string();
        match entries.get(&key) {
            Some((value, expires_at)) if *expires_at > Utc::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(&key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set_raw_in_background(&self, key: &CacheKey, value: String, ttl: u64) {
        let expires_at = Utc::now() + Duration::seconds(ttl as i64);
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), (value, expires_at));
            }
            Err(_) => tracing::error!(key = %key, "Memory cache lock poisoned, dropping write"),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
