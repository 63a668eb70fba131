//! In-memory response cache using moka

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::cache::{CacheEntry, RequestKey, ResponseCache};
use crate::domain::DomainError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
        }
    }
}

impl InMemoryCacheConfig {
    /// Creates a new configuration with specified max capacity
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Thread-safe in-memory response cache
///
/// Entries carry no moka TTL: freshness depends on the reader's window, so
/// expired entries stay until overwritten, invalidated or evicted for
/// capacity.
#[derive(Debug)]
pub struct InMemoryResponseCache {
    cache: MokaCache<RequestKey, CacheEntry>,
    config: InMemoryCacheConfig,
}

impl InMemoryResponseCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new in-memory cache with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .build();

        Self { cache, config }
    }

    pub fn config(&self) -> &InMemoryCacheConfig {
        &self.config
    }
}

impl Default for InMemoryResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn get(&self, key: &RequestKey) -> Result<Option<CacheEntry>, DomainError> {
        Ok(self.cache.get(key).await)
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError> {
        self.cache.insert(entry.key.clone(), entry).await;
        Ok(())
    }

    async fn invalidate(&self, key: &RequestKey) -> Result<bool, DomainError> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn invalidate_prefix(&self, prefix: &str) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;

        let keys_to_delete: Vec<RequestKey> = self
            .cache
            .iter()
            .filter(|(key, _)| key.has_prefix(prefix))
            .map(|(key, _)| (*key).clone())
            .collect();

        let mut deleted = 0;

        for key in keys_to_delete {
            if self.cache.remove(&key).await.is_some() {
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }
}
