//! reqwest-backed persistence client
//!
//! `GET /datasource/{id}` loads a record, `PUT /datasource/{id}` replaces it
//! with the full working copy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::datasource::{DataSource, DataSourceRecord};

use super::errors::{ApiError, ApiResult};
use super::DataSourceApi;

/// Error body returned by the server (`{"error": ..., "code": ...}`)
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the data source persistence endpoint
#[derive(Debug, Clone)]
pub struct HttpDataSourceApi {
    base_url: Url,
    client: Client,
}

impl HttpDataSourceApi {
    pub fn new(
        base_url: &str,
        auth_token: Option<&str>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> ApiResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::Config(format!("invalid base url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!("base url '{}' cannot be a base", base_url)));
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::Config("invalid auth token".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn datasource_url(&self, id: &str) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Config("base url cannot be a base".to_string()))?
            .pop_if_empty()
            .push("datasource")
            .push(id);
        Ok(url)
    }

    async fn error_for(id: &str, response: reqwest::Response) -> ApiError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return ApiError::NotFound(id.to_string());
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    text
                }
            });
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl DataSourceApi for HttpDataSourceApi {
    async fn get_datasource(&self, id: &str) -> ApiResult<DataSourceRecord> {
        let url = self.datasource_url(id)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(id, response).await);
        }

        response
            .json::<DataSourceRecord>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn update_datasource(&self, id: &str, datasource: &DataSource) -> ApiResult<()> {
        let url = self.datasource_url(id)?;
        let response = self
            .client
            .put(url)
            .json(datasource)
            .send()
            .await
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(id, response).await);
        }
        Ok(())
    }
}
