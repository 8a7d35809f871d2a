//! # HTTP Server Module
//!
//! Persistence endpoint for data sources and presentations.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /datasources` - All stored data sources
//! - `GET|PUT /datasource/:id` - Read or replace one data source
//! - `POST /presentation` - Create a presentation
//! - `GET|PUT|DELETE /presentation/:id` - Read, replace or remove one
//! - `GET /presentations?organization=` - List presentations

pub mod config;
pub mod datasource_routes;
pub mod errors;
pub mod presentation_routes;
pub mod seed;
pub mod server;

pub use config::HttpServerConfig;
pub use datasource_routes::DatasourceState;
pub use errors::{ErrorResponse, ServerError, ServerResult};
pub use presentation_routes::PresentationState;
pub use seed::SeedData;
pub use server::HttpServer;
