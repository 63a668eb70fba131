//! Infrastructure layer - External service implementations

pub mod cache;
pub mod dashboard;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod request;
