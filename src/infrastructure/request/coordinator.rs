//! Request cache coordinator

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::consumer::ApiConsumer;
use crate::domain::cache::{CacheEntry, Clock, Payload, RequestKey, ResponseCache, SystemClock};
use crate::domain::request::FetchOptions;
use crate::domain::DomainError;
use crate::infrastructure::http::HttpTransport;
use crate::infrastructure::metrics::{self, CacheLookup};

/// Whether a load may be answered from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheRead {
    Allowed,
    Bypass,
}

/// Resolves request keys to payloads through a shared response cache
///
/// One coordinator owns one cache; consumers share it by holding the
/// coordinator in an `Arc`. The coordinator itself keeps no per-consumer
/// state: cancellation is driven entirely by the tokens callers pass in.
#[derive(Debug)]
pub struct RequestCoordinator {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    cache: Arc<dyn ResponseCache>,
    clock: Arc<dyn Clock>,
}

impl RequestCoordinator {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        cache: Arc<dyn ResponseCache>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            transport,
            cache,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source used for freshness checks
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        &self.cache
    }

    /// Absolute URL for a request key or endpoint path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Returns the payload for `key`, from the cache when fresh
    ///
    /// Cancelling `cancel` before the network call resolves yields
    /// `DomainError::Aborted` and leaves the cache untouched.
    pub async fn fetch_or_load(
        &self,
        key: &RequestKey,
        options: &FetchOptions,
        cancel: &CancellationToken,
    ) -> Result<Payload, DomainError> {
        self.load(key, options, CacheRead::Allowed, cancel, || {})
            .await
    }

    /// Drops the cached entry for `key` and loads it from the network
    pub async fn refresh(
        &self,
        key: &RequestKey,
        options: &FetchOptions,
        cancel: &CancellationToken,
    ) -> Result<Payload, DomainError> {
        self.invalidate(key).await;
        self.load(key, options, CacheRead::Bypass, cancel, || {})
            .await
    }

    /// Removes any cached entry for `key`; does not re-fetch
    pub async fn invalidate(&self, key: &RequestKey) -> bool {
        match self.cache.invalidate(key).await {
            Ok(existed) => {
                debug!(key = %key, existed, "Invalidated cache entry");
                existed
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to invalidate cache entry");
                false
            }
        }
    }

    /// Removes every cached entry under an endpoint prefix
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        match self.cache.invalidate_prefix(prefix).await {
            Ok(removed) => {
                debug!(prefix, removed, "Invalidated cache entries by prefix");
                removed
            }
            Err(e) => {
                warn!(prefix, error = %e, "Failed to invalidate cache entries");
                0
            }
        }
    }

    /// Starts observing `key` with its own request state
    ///
    /// With `options.immediate` set the first fetch is spawned right away, so
    /// this must be called from within a tokio runtime.
    pub fn observe(self: &Arc<Self>, key: RequestKey, options: FetchOptions) -> ApiConsumer {
        ApiConsumer::start(Arc::clone(self), key, options)
    }

    /// Core load path shared by plain fetches and refreshes
    ///
    /// `on_loading` runs once, right before the network call, so a consumer
    /// can publish its Loading state; cache hits never call it.
    pub(crate) async fn load<F>(
        &self,
        key: &RequestKey,
        options: &FetchOptions,
        read: CacheRead,
        cancel: &CancellationToken,
        on_loading: F,
    ) -> Result<Payload, DomainError>
    where
        F: FnOnce() + Send,
    {
        options.validate()?;

        if cancel.is_cancelled() {
            return Err(DomainError::Aborted);
        }

        if options.cache && read == CacheRead::Allowed {
            if let Some(payload) = self.read_fresh(key, options).await {
                return Ok(payload);
            }
        } else {
            metrics::record_cache_lookup(key.path(), CacheLookup::Bypass);
        }

        on_loading();

        let url = self.url_for(key.as_str());
        let started = Instant::now();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(key = %key, "Request aborted");
                metrics::record_abort(key.path());
                return Err(DomainError::Aborted);
            }
            result = self.transport.get_json(&url) => result,
        };

        if cancel.is_cancelled() {
            debug!(key = %key, "Request aborted after response");
            metrics::record_abort(key.path());
            return Err(DomainError::Aborted);
        }

        metrics::record_fetch(key.path(), started.elapsed(), result.is_ok());

        let value = result.inspect_err(|e| {
            warn!(key = %key, error = %e, "API request failed");
        })?;

        let payload: Payload = Arc::new(value);

        // Nothing suspends between the cancellation check above and this
        // write. The write is the commit point: a cancel that arrives while
        // it is in progress finds the request already completed.
        if options.cache {
            let entry = CacheEntry::new(key.clone(), Arc::clone(&payload), self.clock.now());

            if let Err(e) = self.cache.put(entry).await {
                warn!(key = %key, error = %e, "Failed to store response in cache");
            }
        }

        Ok(payload)
    }

    async fn read_fresh(&self, key: &RequestKey, options: &FetchOptions) -> Option<Payload> {
        let now = self.clock.now();

        match self.cache.get_fresh(key, now, options.ttl).await {
            Ok(Some(entry)) => {
                debug!(key = %key, "Cache hit");
                metrics::record_cache_lookup(key.path(), CacheLookup::Hit);
                Some(entry.payload)
            }
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                metrics::record_cache_lookup(key.path(), CacheLookup::Miss);
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, falling back to network");
                metrics::record_cache_lookup(key.path(), CacheLookup::Miss);
                None
            }
        }
    }
}
