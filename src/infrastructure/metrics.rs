//! Request metrics
//!
//! Recorded through the `metrics` facade; they are no-ops until the embedding
//! application installs a recorder.

use std::time::Duration;

use metrics::{counter, histogram};

/// Outcome of a cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    Hit,
    Miss,
    Bypass,
}

impl CacheLookup {
    fn as_str(&self) -> &'static str {
        match self {
            CacheLookup::Hit => "hit",
            CacheLookup::Miss => "miss",
            CacheLookup::Bypass => "bypass",
        }
    }
}

/// Record a cache lookup for an endpoint path
pub fn record_cache_lookup(endpoint: &str, lookup: CacheLookup) {
    let labels = [
        ("endpoint", endpoint.to_string()),
        ("result", lookup.as_str().to_string()),
    ];

    counter!("dashboard_cache_lookups_total", &labels).increment(1);
}

/// Record a completed network request
pub fn record_fetch(endpoint: &str, duration: Duration, success: bool) {
    let labels = [
        ("endpoint", endpoint.to_string()),
        ("success", success.to_string()),
    ];

    counter!("dashboard_fetches_total", &labels).increment(1);
    histogram!("dashboard_fetch_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record a request dropped by cancellation
pub fn record_abort(endpoint: &str) {
    counter!("dashboard_fetches_aborted_total", "endpoint" => endpoint.to_string()).increment(1);
}
