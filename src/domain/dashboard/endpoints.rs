//! Request keys and freshness windows for the dashboard read endpoints

use std::time::Duration;

use crate::domain::cache::RequestKey;
use crate::domain::request::FetchOptions;

/// Path prefix shared by every aggregated read
pub const DASHBOARD_PREFIX: &str = "/dashboard/";

/// KPIs move fastest, so they get the shortest window
pub const KPI_TTL: Duration = Duration::from_secs(3 * 60);
pub const REVENUE_TREND_TTL: Duration = Duration::from_secs(5 * 60);
pub const PRODUCT_PERFORMANCE_TTL: Duration = Duration::from_secs(5 * 60);
pub const CUSTOMER_ANALYTICS_TTL: Duration = Duration::from_secs(5 * 60);

pub const DEFAULT_DAYS: u32 = 30;
pub const DEFAULT_PRODUCT_LIMIT: u32 = 10;

pub fn kpis_key(days: u32) -> RequestKey {
    RequestKey::new("/dashboard/kpis").with_param("days", days)
}

pub fn revenue_trend_key(days: u32) -> RequestKey {
    RequestKey::new("/dashboard/revenue-trend").with_param("days", days)
}

pub fn product_performance_key(limit: u32) -> RequestKey {
    RequestKey::new("/dashboard/product-performance").with_param("limit", limit)
}

pub fn customer_analytics_key() -> RequestKey {
    RequestKey::new("/dashboard/customer-analytics")
}

pub fn kpis_options() -> FetchOptions {
    FetchOptions::new().with_ttl(KPI_TTL)
}

pub fn revenue_trend_options() -> FetchOptions {
    FetchOptions::new().with_ttl(REVENUE_TREND_TTL)
}

pub fn product_performance_options() -> FetchOptions {
    FetchOptions::new().with_ttl(PRODUCT_PERFORMANCE_TTL)
}

pub fn customer_analytics_options() -> FetchOptions {
    FetchOptions::new().with_ttl(CUSTOMER_ANALYTICS_TTL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_templates() {
        assert_eq!(kpis_key(30).as_str(), "/dashboard/kpis?days=30");
        assert_eq!(revenue_trend_key(7).as_str(), "/dashboard/revenue-trend?days=7");
        assert_eq!(
            product_performance_key(5).as_str(),
            "/dashboard/product-performance?limit=5"
        );
        assert_eq!(
            customer_analytics_key().as_str(),
            "/dashboard/customer-analytics"
        );
    }

    #[test]
    fn test_windows() {
        assert_eq!(kpis_options().ttl, Duration::from_millis(180_000));
        assert_eq!(revenue_trend_options().ttl, Duration::from_millis(300_000));
        assert!(kpis_options().cache);
    }

    #[test]
    fn test_keys_share_prefix() {
        for key in [
            kpis_key(DEFAULT_DAYS),
            revenue_trend_key(DEFAULT_DAYS),
            product_performance_key(DEFAULT_PRODUCT_LIMIT),
            customer_analytics_key(),
        ] {
            assert!(key.has_prefix(DASHBOARD_PREFIX));
        }
    }
}
