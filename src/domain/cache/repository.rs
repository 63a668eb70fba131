//! Response cache trait definition

use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::key::RequestKey;
use crate::domain::DomainError;

/// Decoded response body shared between every reader of a key
pub type Payload = Arc<serde_json::Value>;

/// A stored response
///
/// Entries are never mutated in place: a newer response replaces the whole
/// entry, and invalidation removes it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: RequestKey,
    pub payload: Payload,
    pub stored_at: Instant,
}

impl CacheEntry {
    pub fn new(key: RequestKey, payload: Payload, stored_at: Instant) -> Self {
        Self {
            key,
            payload,
            stored_at,
        }
    }

    /// An entry is readable while `now - stored_at < ttl`
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// Shared store of decoded responses keyed by request identity
///
/// Freshness is judged by the reader, since each consumer brings its own TTL.
#[async_trait]
pub trait ResponseCache: Send + Sync + Debug {
    /// Gets the entry stored for a key, fresh or not
    async fn get(&self, key: &RequestKey) -> Result<Option<CacheEntry>, DomainError>;

    /// Stores an entry, replacing any previous one for the same key
    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError>;

    /// Removes the entry for a key, returning whether one existed
    async fn invalidate(&self, key: &RequestKey) -> Result<bool, DomainError>;

    /// Removes every entry whose path starts with `prefix`
    async fn invalidate_prefix(&self, prefix: &str) -> Result<usize, DomainError>;

    /// Clears all entries
    async fn clear(&self) -> Result<(), DomainError>;

    /// Returns approximate number of entries
    async fn size(&self) -> Result<usize, DomainError>;

    /// Gets the entry only when it is still fresh for `ttl`
    async fn get_fresh(
        &self,
        key: &RequestKey,
        now: Instant,
        ttl: Duration,
    ) -> Result<Option<CacheEntry>, DomainError> {
        Ok(self
            .get(key)
            .await?
            .filter(|entry| entry.is_fresh(now, ttl)))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock cache for testing
    #[derive(Debug, Default)]
    pub struct MockResponseCache {
        entries: Mutex<HashMap<RequestKey, CacheEntry>>,
        error: Mutex<Option<String>>,
        put_delay: Mutex<Option<Duration>>,
    }

    impl MockResponseCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        /// Makes every `put` sleep before storing the entry
        pub fn with_put_delay(self, delay: Duration) -> Self {
            *self.put_delay.lock().unwrap() = Some(delay);
            self
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::cache(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ResponseCache for MockResponseCache {
        async fn get(&self, key: &RequestKey) -> Result<Option<CacheEntry>, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn put(&self, entry: CacheEntry) -> Result<(), DomainError> {
            self.check_error()?;
            let delay = *self.put_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.entries
                .lock()
                .unwrap()
                .insert(entry.key.clone(), entry);
            Ok(())
        }

        async fn invalidate(&self, key: &RequestKey) -> Result<bool, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().remove(key).is_some())
        }

        async fn invalidate_prefix(&self, prefix: &str) -> Result<usize, DomainError> {
            self.check_error()?;
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|key, _| !key.has_prefix(prefix));
            Ok(before - entries.len())
        }

        async fn clear(&self) -> Result<(), DomainError> {
            self.check_error()?;
            self.entries.lock().unwrap().clear();
            Ok(())
        }

        async fn size(&self) -> Result<usize, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().len())
        }
    }
}
