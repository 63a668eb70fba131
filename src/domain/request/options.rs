use std::time::Duration;

use crate::domain::DomainError;

/// Freshness window used when a caller does not pick one
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Per-consumer fetch configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Consult and populate the shared cache
    pub cache: bool,
    /// Freshness window for cached entries
    pub ttl: Duration,
    /// Fetch as soon as a consumer starts observing
    pub immediate: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            cache: true,
            ttl: DEFAULT_TTL,
            immediate: true,
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.ttl.is_zero() {
            return Err(DomainError::validation("ttl must be greater than 0"));
        }

        Ok(())
    }
}
