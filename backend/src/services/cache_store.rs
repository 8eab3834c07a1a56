//! Key-value cache store with per-entry expiry
//!
//! The cache layer only needs `get` and `set` with a TTL. `CacheClient` makes
//! the "no store configured" case an explicit state instead of a missing global.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::CacheError;

/// String key-value store with TTL semantics
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value for `key`, or `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous entry
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Drop expired entries for stores that do not expire them on their own
    fn purge_expired(&self) -> usize {
        0
    }
}

/// A stored value with its expiry instant
#[derive(Debug, Clone)]
struct StoredEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl StoredEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-process store backed by `DashMap`; distinct keys never contend
pub struct MemoryStore {
    entries: DashMap<String, StoredEntry>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Number of entries, expired ones included until next read
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = self.clock.now();
        let value = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
            Some(_) => None,
            None => return Ok(None),
        };

        if value.is_none() {
            self.entries
                .remove_if(key, |_, entry| entry.is_expired(now));
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = self.clock.now() + ttl;
        self.entries
            .insert(key.to_string(), StoredEntry { value, expires_at });
        Ok(())
    }

    fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }
}

/// Cache dependency handed to the cache layer
#[derive(Clone)]
pub enum CacheClient {
    Available(Arc<dyn KeyValueStore>),
    Unavailable,
}

impl CacheClient {
    pub fn is_available(&self) -> bool {
        matches!(self, CacheClient::Available(_))
    }
}

impl std::fmt::Debug for CacheClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheClient::Available(_) => f.write_str("CacheClient::Available"),
            CacheClient::Unavailable => f.write_str("CacheClient::Unavailable"),
        }
    }
}
