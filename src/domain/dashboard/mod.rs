//! Dashboard domain - API models, entry payloads and endpoint keys

pub mod endpoints;
mod entity;
mod entry;
mod template;

pub use entity::{
    CustomerAnalytics, EntryConfirmation, KpiSummary, ProductPerformance, RevenuePoint,
    TopProduct, UploadResult,
};
pub use entry::{
    EntryValidationError, QuickCustomer, QuickExpense, QuickSale, MAX_PRODUCT_NAME_LENGTH,
    MAX_SALE_AMOUNT,
};
pub use template::{CsvTemplate, DataKind};
