//! BizDash client
//!
//! Client library for a small-business analytics REST API with support for:
//! - Cached KPI, revenue trend, product and customer reads
//! - Per-consumer request state with cancellation of superseded requests
//! - CSV bulk imports, CSV templates and quick manual entry

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::DomainError;
use infrastructure::cache::{InMemoryCacheConfig, InMemoryResponseCache};
use infrastructure::dashboard::DashboardApi;
use infrastructure::http::HttpClient;
use infrastructure::request::RequestCoordinator;

/// Create the request coordinator from configuration
pub fn create_coordinator(config: &AppConfig) -> Result<Arc<RequestCoordinator>, DomainError> {
    config.validate()?;

    let transport = match config.api.request_timeout() {
        Some(timeout) => HttpClient::with_timeout(timeout)?,
        None => HttpClient::new()?,
    };

    let cache = InMemoryResponseCache::with_config(
        InMemoryCacheConfig::default().with_max_capacity(config.cache.max_capacity),
    );

    tracing::debug!(
        base_url = %config.api.base_url,
        max_capacity = config.cache.max_capacity,
        "Request coordinator created"
    );

    Ok(Arc::new(RequestCoordinator::new(
        config.api.base_url.clone(),
        Arc::new(transport),
        Arc::new(cache),
    )))
}

/// Create the typed dashboard client from configuration
pub fn create_dashboard_api(config: &AppConfig) -> Result<DashboardApi, DomainError> {
    Ok(DashboardApi::new(create_coordinator(config)?))
}
