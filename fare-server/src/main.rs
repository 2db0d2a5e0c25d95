use std::net::SocketAddr;

use fare_server::config::{FareConfig, FareContext};
use fare_server::pricing::Pricing;
use fare_server::web::{AppState, create_router};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,fare_server=debug";

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Configuration problems are fatal before binding
    let config = FareConfig::load().unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to load configuration");
        std::process::exit(1);
    });
    let ctx = FareContext::from_config(&config).unwrap_or_else(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::process::exit(1);
    });
    let pricing = Pricing::from_config(&config.pricing).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to create pricing client");
        std::process::exit(1);
    });

    if pricing.is_live() {
        tracing::info!("live pricing enabled");
    } else {
        tracing::warn!("PRICING_API_URL not set, quotes use the offline tariff only");
    }

    let addr: SocketAddr = config.server.bind.parse().unwrap_or_else(|e| {
        tracing::error!(bind = %config.server.bind, error = %e, "invalid bind address");
        std::process::exit(1);
    });

    let state = AppState::new(ctx, pricing);
    let app = create_router(state);

    tracing::info!(%addr, "fare server listening");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  POST /quote           - Quote a free-text message");
    tracing::info!("  POST /quote/route     - Quote a known route");
    tracing::info!("  GET  /areas/resolve   - Resolve an area mention");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap_or_else(|e| {
        tracing::error!(%addr, error = %e, "failed to bind");
        std::process::exit(1);
    });
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
