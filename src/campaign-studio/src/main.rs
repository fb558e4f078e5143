//! Campaign Studio — AI-powered marketing campaign generator.
//!
//! Main entry point that initializes the model registry and starts the
//! web server.

use clap::Parser;
use std::sync::Arc;
use studio_core::config::AppConfig;
use studio_generator::ContentGenerator;
use studio_models::ModelRegistry;
use studio_web::ApiServer;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "campaign-studio")]
#[command(about = "AI-powered marketing campaign generator")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "CAMPAIGN_STUDIO__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CAMPAIGN_STUDIO__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Load the model bundle at startup instead of on first request
    #[arg(long, default_value_t = false)]
    preload: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campaign_studio=info,studio_web=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Campaign Studio starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        provider = ?config.models.provider,
        "Configuration loaded"
    );

    // Initialize the model registry; pipelines load on first request
    // unless preloading was requested.
    let registry = Arc::new(ModelRegistry::new(config.models.clone()));
    if cli.preload {
        registry
            .bundle()
            .await
            .map_err(|e| anyhow::anyhow!("model preload failed: {e}"))?;
        info!("Model bundle preloaded");
    }

    let generator = Arc::new(ContentGenerator::new(
        registry,
        config.generation.clone(),
    ));

    // Start API server
    let api_server = ApiServer::new(config, generator);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Campaign Studio is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
