//! Domain layer - Core types for the dashboard client

pub mod cache;
pub mod dashboard;
pub mod error;
pub mod request;

pub use cache::{CacheEntry, Clock, ManualClock, Payload, RequestKey, ResponseCache, SystemClock};
pub use dashboard::{
    CsvTemplate, CustomerAnalytics, DataKind, EntryConfirmation, KpiSummary, ProductPerformance,
    QuickCustomer, QuickExpense, QuickSale, RevenuePoint, TopProduct, UploadResult,
};
pub use error::DomainError;
pub use request::{FetchOptions, RequestState, RequestStatus};
