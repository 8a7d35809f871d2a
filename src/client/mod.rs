//! Data source persistence client
//!
//! The persistence endpoint is an external collaborator. Editing sessions
//! only see the [`DataSourceApi`] trait.

mod errors;
mod http;
mod memory;

use async_trait::async_trait;

use crate::datasource::{DataSource, DataSourceRecord};

pub use errors::{ApiError, ApiResult};
pub use http::HttpDataSourceApi;
pub use memory::MemoryDataSourceApi;

/// Loads and replaces data sources by id
#[async_trait]
pub trait DataSourceApi: Send + Sync {
    /// Fetches a data source; its settings may be absent or legacy-shaped.
    async fn get_datasource(&self, id: &str) -> ApiResult<DataSourceRecord>;

    /// Replaces the stored data source with `datasource` in one call.
    async fn update_datasource(&self, id: &str, datasource: &DataSource) -> ApiResult<()>;
}
