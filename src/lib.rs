//! dsconfig - query configuration for experiment data sources
//!
//! Normalizes stored data source settings, generates default SQL templates,
//! and drives the edit/save cycle of a settings form against a persistence
//! endpoint. Also serves that endpoint, with presentation documents.

pub mod cli;
pub mod client;
pub mod config;
pub mod datasource;
pub mod form;
pub mod http_server;
pub mod observability;
pub mod presentation;
pub mod telemetry;
