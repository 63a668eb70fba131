use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::domain::DomainError;

/// A file sent as one multipart field
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub field: String,
    pub file_name: String,
    pub content: Bytes,
}

impl FileUpload {
    /// Upload under the `file` field, which is what the import endpoints expect
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            field: "file".to_string(),
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, DomainError>;

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;

    async fn post_multipart(
        &self,
        url: &str,
        upload: FileUpload,
    ) -> Result<serde_json::Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self, DomainError> {
        Self::build(None)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self, DomainError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            DomainError::configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self { client })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<serde_json::Value, DomainError> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::http(status.as_u16(), error_body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::network(format!("Failed to read response body: {}", e)))?;

        serde_json::from_slice(&body).map_err(|e| DomainError::decode(e.to_string()))
    }
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, DomainError> {
        self.send(self.client.get(url)).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        self.send(self.client.post(url).json(body)).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        upload: FileUpload,
    ) -> Result<serde_json::Value, DomainError> {
        let part = reqwest::multipart::Part::bytes(upload.content.to_vec())
            .file_name(upload.file_name)
            .mime_str("text/csv")
            .map_err(|e| DomainError::validation(format!("Invalid upload: {}", e)))?;

        let form = reqwest::multipart::Form::new().part(upload.field, part);

        self.send(self.client.post(url).multipart(form)).await
    }
}
