//! HTTP server wiring.

use crate::progress::TracingProgress;
use crate::rest::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use studio_core::config::AppConfig;
use studio_generator::ContentGenerator;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Main API server for the campaign UI and artifact endpoints.
pub struct ApiServer {
    config: AppConfig,
    generator: Arc<ContentGenerator>,
}

impl ApiServer {
    pub fn new(config: AppConfig, generator: Arc<ContentGenerator>) -> Self {
        Self { config, generator }
    }

    /// Start the HTTP server (blocks until shutdown).
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let state = AppState {
            generator: self.generator.clone(),
            progress: Arc::new(TracingProgress),
            sessions: Arc::new(DashMap::new()),
            session_ttl: chrono::Duration::seconds(self.config.api.session_ttl_secs as i64),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
        };

        let app = Router::new()
            // Campaign UI
            .route("/", get(rest::index))
            .route("/campaign/:id", get(rest::results_page))
            // Generation + artifacts
            .route("/v1/campaign", post(rest::handle_generate))
            .route("/v1/campaign/:id/image.png", get(rest::campaign_image))
            .route("/v1/campaign/:id/package", get(rest::download_package))
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics exporter on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}
