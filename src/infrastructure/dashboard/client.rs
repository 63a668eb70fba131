//! Dashboard API client

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::cache::RequestKey;
use crate::domain::dashboard::endpoints::{self, DASHBOARD_PREFIX};
use crate::domain::dashboard::{
    CsvTemplate, CustomerAnalytics, DataKind, EntryConfirmation, KpiSummary, ProductPerformance,
    QuickCustomer, QuickExpense, QuickSale, RevenuePoint, UploadResult,
};
use crate::domain::request::FetchOptions;
use crate::domain::DomainError;
use crate::infrastructure::http::FileUpload;
use crate::infrastructure::request::{ApiConsumer, RequestCoordinator};

fn decode<T: DeserializeOwned>(value: &serde_json::Value) -> Result<T, DomainError> {
    T::deserialize(value).map_err(|e| DomainError::decode(e.to_string()))
}

/// Typed access to the dashboard REST API
///
/// Reads go through the shared request coordinator and its cache. Writes
/// (imports and quick entries) always hit the network and invalidate the
/// cached dashboard reads on success.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    coordinator: Arc<RequestCoordinator>,
}

impl DashboardApi {
    pub fn new(coordinator: Arc<RequestCoordinator>) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &Arc<RequestCoordinator> {
        &self.coordinator
    }

    /// Consumer for the KPI summary over the last `days` days
    pub fn kpis(&self, days: u32) -> ApiConsumer {
        self.coordinator
            .observe(endpoints::kpis_key(days), endpoints::kpis_options())
    }

    /// Consumer for the daily revenue series
    pub fn revenue_trend(&self, days: u32) -> ApiConsumer {
        self.coordinator.observe(
            endpoints::revenue_trend_key(days),
            endpoints::revenue_trend_options(),
        )
    }

    /// Consumer for the top `limit` products
    pub fn product_performance(&self, limit: u32) -> ApiConsumer {
        self.coordinator.observe(
            endpoints::product_performance_key(limit),
            endpoints::product_performance_options(),
        )
    }

    pub fn customer_analytics(&self) -> ApiConsumer {
        self.coordinator.observe(
            endpoints::customer_analytics_key(),
            endpoints::customer_analytics_options(),
        )
    }

    pub async fn get_kpis(&self, days: u32) -> Result<KpiSummary, DomainError> {
        self.load(&endpoints::kpis_key(days), &endpoints::kpis_options())
            .await
    }

    pub async fn get_revenue_trend(&self, days: u32) -> Result<Vec<RevenuePoint>, DomainError> {
        self.load(
            &endpoints::revenue_trend_key(days),
            &endpoints::revenue_trend_options(),
        )
        .await
    }

    pub async fn get_product_performance(
        &self,
        limit: u32,
    ) -> Result<Vec<ProductPerformance>, DomainError> {
        self.load(
            &endpoints::product_performance_key(limit),
            &endpoints::product_performance_options(),
        )
        .await
    }

    pub async fn get_customer_analytics(&self) -> Result<CustomerAnalytics, DomainError> {
        self.load(
            &endpoints::customer_analytics_key(),
            &endpoints::customer_analytics_options(),
        )
        .await
    }

    /// Uploads a CSV file from disk
    pub async fn upload_csv_file(
        &self,
        kind: DataKind,
        path: &Path,
    ) -> Result<UploadResult, DomainError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| DomainError::validation(format!("Invalid file path: {}", path.display())))?
            .to_string();

        Self::check_csv_name(&file_name)?;

        let content = tokio::fs::read(path).await.map_err(|e| {
            DomainError::io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.upload_csv(kind, FileUpload::new(file_name, content))
            .await
    }

    /// Uploads CSV content for bulk import
    pub async fn upload_csv(
        &self,
        kind: DataKind,
        upload: FileUpload,
    ) -> Result<UploadResult, DomainError> {
        Self::check_csv_name(&upload.file_name)?;

        let url = self.coordinator.url_for(&kind.upload_path());
        debug!(kind = %kind, file = %upload.file_name, bytes = upload.content.len(), "Uploading CSV");

        let value = self.coordinator.transport().post_multipart(&url, upload).await?;
        let result: UploadResult = decode(&value)?;

        info!(
            kind = %kind,
            records = result.records_processed,
            errors = result.errors.len(),
            "CSV import finished"
        );

        self.invalidate_dashboard().await;
        Ok(result)
    }

    pub async fn quick_sale(&self, sale: QuickSale) -> Result<EntryConfirmation, DomainError> {
        let sale = sale.normalized()?;
        self.post_entry("/entry/quick-sale", &sale).await
    }

    pub async fn quick_customer(
        &self,
        customer: QuickCustomer,
    ) -> Result<EntryConfirmation, DomainError> {
        customer.validate()?;
        self.post_entry("/entry/quick-customer", &customer).await
    }

    pub async fn quick_expense(
        &self,
        expense: QuickExpense,
    ) -> Result<EntryConfirmation, DomainError> {
        expense.validate()?;
        self.post_entry("/entry/quick-expense", &expense).await
    }

    /// Fetches the column layout for an import type
    pub async fn csv_template(&self, kind: DataKind) -> Result<CsvTemplate, DomainError> {
        let url = self.coordinator.url_for(&kind.template_path());
        let value = self.coordinator.transport().get_json(&url).await?;
        decode(&value)
    }

    /// Drops every cached dashboard read
    pub async fn invalidate_dashboard(&self) -> usize {
        self.coordinator.invalidate_prefix(DASHBOARD_PREFIX).await
    }

    async fn load<T: DeserializeOwned>(
        &self,
        key: &RequestKey,
        options: &FetchOptions,
    ) -> Result<T, DomainError> {
        let payload = self
            .coordinator
            .fetch_or_load(key, options, &CancellationToken::new())
            .await?;

        decode(&payload)
    }

    async fn post_entry<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<EntryConfirmation, DomainError> {
        let body = serde_json::to_value(body)
            .map_err(|e| DomainError::validation(format!("Failed to encode entry: {}", e)))?;

        let url = self.coordinator.url_for(path);
        let value = self.coordinator.transport().post_json(&url, &body).await?;
        let confirmation: EntryConfirmation = decode(&value)?;

        info!(path, "Entry recorded");

        self.invalidate_dashboard().await;
        Ok(confirmation)
    }

    fn check_csv_name(file_name: &str) -> Result<(), DomainError> {
        if !file_name.ends_with(".csv") {
            return Err(DomainError::validation("File must be a CSV"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::RequestStatus;
    use crate::infrastructure::cache::InMemoryResponseCache;
    use crate::infrastructure::http::MockHttpTransport;

    const BASE: &str = "http://api.test/api/v1";

    fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }

    fn api(transport: Arc<MockHttpTransport>) -> DashboardApi {
        DashboardApi::new(Arc::new(RequestCoordinator::new(
            BASE,
            transport,
            Arc::new(InMemoryResponseCache::new()),
        )))
    }

    fn kpi_body() -> serde_json::Value {
        serde_json::json!({
            "revenue": 24847,
            "profit_margin": 18.2,
            "avg_order_value": 27.8,
            "repeat_customers": 1247,
            "top_products": [
                {"product_name": "iPhone 15 Pro", "total_revenue": 1199, "total_sales": 1}
            ]
        })
    }

    #[tokio::test]
    async fn test_get_kpis_typed_and_cached() {
        let transport = Arc::new(
            MockHttpTransport::new().with_response(url("/dashboard/kpis?days=30"), kpi_body()),
        );
        let api = api(transport.clone());

        let kpis = api.get_kpis(30).await.unwrap();
        assert_eq!(kpis.revenue, 24847.0);

        api.get_kpis(30).await.unwrap();
        assert_eq!(transport.call_count(&url("/dashboard/kpis?days=30")), 1);
    }

    #[tokio::test]
    async fn test_different_windows_are_different_keys() {
        let transport = Arc::new(
            MockHttpTransport::new()
                .with_response(url("/dashboard/kpis?days=30"), kpi_body())
                .with_response(url("/dashboard/kpis?days=7"), kpi_body()),
        );
        let api = api(transport.clone());

        api.get_kpis(30).await.unwrap();
        api.get_kpis(7).await.unwrap();

        assert_eq!(transport.call_count(&url("/dashboard/kpis?days=30")), 1);
        assert_eq!(transport.call_count(&url("/dashboard/kpis?days=7")), 1);
    }

    #[tokio::test]
    async fn test_revenue_trend_consumer() {
        let transport = Arc::new(MockHttpTransport::new().with_response(
            url("/dashboard/revenue-trend?days=7"),
            serde_json::json!([
                {"date": "2024-01-14", "revenue": 100.0},
                {"date": "2024-01-15", "revenue": 129.5}
            ]),
        ));
        let api = api(transport);

        let consumer = api.revenue_trend(7);
        let state = consumer.settled().await;

        assert_eq!(state.status, RequestStatus::Success);
        let points: Vec<RevenuePoint> = consumer.data_as().unwrap().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].revenue, 129.5);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_decode_error() {
        let transport = Arc::new(MockHttpTransport::new().with_response(
            url("/dashboard/customer-analytics"),
            serde_json::json!({"unexpected": true}),
        ));
        let api = api(transport);

        let err = api.get_customer_analytics().await.unwrap_err();
        assert!(matches!(err, DomainError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_quick_sale_posts_normalized_body_and_invalidates() {
        let transport = Arc::new(
            MockHttpTransport::new()
                .with_response(url("/dashboard/kpis?days=30"), kpi_body())
                .with_response(
                    url("/entry/quick-sale"),
                    serde_json::json!({"success": true, "sale_id": 7, "message": "Sale recorded successfully"}),
                ),
        );
        let api = api(transport.clone());

        api.get_kpis(30).await.unwrap();

        let confirmation = api
            .quick_sale(QuickSale::new(" Widget A ", 29.994))
            .await
            .unwrap();
        assert!(confirmation.success);

        let body = transport.last_body(&url("/entry/quick-sale")).unwrap();
        assert_eq!(body, serde_json::json!({"product_name": "Widget A", "amount": 29.99}));

        api.get_kpis(30).await.unwrap();
        assert_eq!(transport.call_count(&url("/dashboard/kpis?days=30")), 2);
    }

    #[tokio::test]
    async fn test_invalid_sale_never_sent() {
        let transport = Arc::new(MockHttpTransport::new());
        let api = api(transport.clone());

        let err = api.quick_sale(QuickSale::new("", 10.0)).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(transport.call_count(&url("/entry/quick-sale")), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_csv() {
        let transport = Arc::new(MockHttpTransport::new());
        let api = api(transport.clone());

        let err = api
            .upload_csv(DataKind::Sales, FileUpload::new("sales.xlsx", "a,b\n"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(transport.call_count(&url("/data/upload-sales-csv")), 0);
    }

    #[tokio::test]
    async fn test_upload_sends_file_field() {
        let transport = Arc::new(MockHttpTransport::new().with_response(
            url("/data/upload-expenses-csv"),
            serde_json::json!({"message": "ok", "records_processed": 2, "errors": []}),
        ));
        let api = api(transport.clone());

        let result = api
            .upload_csv(
                DataKind::Expenses,
                FileUpload::new("expenses.csv", "date,description,amount\n"),
            )
            .await
            .unwrap();

        assert_eq!(result.records_processed, 2);
        let body = transport.last_body(&url("/data/upload-expenses-csv")).unwrap();
        assert_eq!(body["field"], "file");
        assert_eq!(body["file_name"], "expenses.csv");
    }

    #[tokio::test]
    async fn test_csv_template() {
        let transport = Arc::new(MockHttpTransport::new().with_response(
            url("/data/upload-template/customers"),
            serde_json::json!({
                "columns": ["id", "name", "email"],
                "example": {"id": "CUST001", "name": "John Doe", "email": "john@example.com"}
            }),
        ));
        let api = api(transport);

        let template = api.csv_template(DataKind::Customers).await.unwrap();
        assert_eq!(
            template.to_csv(),
            "id,name,email\nCUST001,John Doe,john@example.com\n"
        );
    }
}
