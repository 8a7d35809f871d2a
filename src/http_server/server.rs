//! # HTTP Server
//!
//! Combines the health, data source and presentation routers behind CORS
//! and request tracing.

use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::observability::Event;

use super::config::HttpServerConfig;
use super::datasource_routes::{datasource_routes, DatasourceState};
use super::presentation_routes::{presentation_routes, PresentationState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

pub struct HttpServer {
    config: HttpServerConfig,
    datasources: Arc<DatasourceState>,
    presentations: Arc<PresentationState>,
    router: Router,
}

impl HttpServer {
    /// Server over empty stores
    pub fn new() -> Self {
        Self::with_config(HttpServerConfig::default())
    }

    pub fn with_config(config: HttpServerConfig) -> Self {
        Self::with_state(
            config,
            Arc::new(DatasourceState::new()),
            Arc::new(PresentationState::new()),
        )
    }

    pub fn with_state(
        config: HttpServerConfig,
        datasources: Arc<DatasourceState>,
        presentations: Arc<PresentationState>,
    ) -> Self {
        let router = Self::build_router(&config, Arc::clone(&datasources), Arc::clone(&presentations));
        Self {
            config,
            datasources,
            presentations,
            router,
        }
    }

    fn build_router(
        config: &HttpServerConfig,
        datasources: Arc<DatasourceState>,
        presentations: Arc<PresentationState>,
    ) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let router = Router::new()
            .route("/health", get(health_handler))
            .merge(datasource_routes(datasources))
            .merge(presentation_routes(presentations))
            .layer(cors);

        if config.trace_requests {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        }
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    pub fn datasources(&self) -> &Arc<DatasourceState> {
        &self.datasources
    }

    pub fn presentations(&self) -> &Arc<PresentationState> {
        &self.presentations
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Binds the configured address and serves until ctrl-c
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self
            .config
            .parse_socket_addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(
            event = %Event::Serving,
            addr = %addr,
            datasources = self.datasources.len(),
            presentations = self.presentations.store.len(),
            "serving"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!(event = %Event::ShutdownComplete, "server stopped");
        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    // An error here means no handler could be installed; serve until killed.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
