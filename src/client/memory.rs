//! In-memory persistence client
//!
//! Keeps records in a map and remembers every update payload. Updates can be
//! made to fail or stall, which is how editing sessions are exercised without
//! a server.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::datasource::{DataSource, DataSourceRecord};

use super::errors::{ApiError, ApiResult};
use super::DataSourceApi;

#[derive(Debug, Default)]
pub struct MemoryDataSourceApi {
    records: RwLock<HashMap<String, DataSourceRecord>>,
    updates: Mutex<Vec<DataSource>>,
    failure: Mutex<Option<ApiError>>,
    delay: Option<Duration>,
}

impl MemoryDataSourceApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every update call sleeps this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn insert(&self, record: DataSourceRecord) {
        if let Ok(mut records) = self.records.write() {
            records.insert(record.id.clone(), record);
        }
    }

    pub fn with_record(self, record: DataSourceRecord) -> Self {
        self.insert(record);
        self
    }

    /// Makes every following update fail with `error`
    pub fn fail_updates(&self, error: ApiError) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(error);
        }
    }

    pub fn clear_failure(&self) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = None;
        }
    }

    /// Payloads of every update call, successful or not
    pub fn updates(&self) -> Vec<DataSource> {
        self.updates.lock().map(|u| u.clone()).unwrap_or_default()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().map(|u| u.len()).unwrap_or_default()
    }

    pub fn record(&self, id: &str) -> Option<DataSourceRecord> {
        self.records.read().ok()?.get(id).cloned()
    }
}

#[async_trait]
impl DataSourceApi for MemoryDataSourceApi {
    async fn get_datasource(&self, id: &str) -> ApiResult<DataSourceRecord> {
        let records = self
            .records
            .read()
            .map_err(|_| ApiError::Unavailable("Lock poisoned".into()))?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn update_datasource(&self, id: &str, datasource: &DataSource) -> ApiResult<()> {
        {
            let mut updates = self
                .updates
                .lock()
                .map_err(|_| ApiError::Unavailable("Lock poisoned".into()))?;
            updates.push(datasource.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .failure
            .lock()
            .map_err(|_| ApiError::Unavailable("Lock poisoned".into()))?
            .clone();
        if let Some(error) = failure {
            return Err(error);
        }

        let mut records = self
            .records
            .write()
            .map_err(|_| ApiError::Unavailable("Lock poisoned".into()))?;
        if !records.contains_key(id) {
            return Err(ApiError::NotFound(id.to_string()));
        }
        records.insert(id.to_string(), DataSourceRecord::from(datasource.clone()));
        Ok(())
    }
}
