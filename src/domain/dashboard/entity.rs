//! Response models for the dashboard REST API

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Best-selling product line inside a KPI summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_name: String,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default, alias = "total_quantity")]
    pub total_sales: u64,
}

/// Headline KPIs for a day window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub revenue: f64,
    #[serde(default)]
    pub profit_margin: f64,
    #[serde(default)]
    pub avg_order_value: f64,
    #[serde(default)]
    pub repeat_customers: u64,
    #[serde(default)]
    pub top_products: Vec<TopProduct>,
}

/// One day of the revenue trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<u64>,
}

/// Per-product performance row
///
/// The endpoint may return extra metrics; they are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPerformance {
    pub product_name: String,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Customer segmentation summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerAnalytics {
    pub total_customers: u64,
    #[serde(default)]
    pub new_customers: u64,
    #[serde(default)]
    pub repeat_customers: u64,
    #[serde(default)]
    pub vip_customers: u64,
    #[serde(default)]
    pub repeat_rate: f64,
}

/// Outcome of a CSV import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, alias = "processed_count")]
    pub records_processed: u64,
    #[serde(default)]
    pub total_rows: Option<u64>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl UploadResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.success == Some(false)
    }
}

/// Confirmation returned by the quick-entry endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryConfirmation {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub ids: BTreeMap<String, serde_json::Value>,
}
