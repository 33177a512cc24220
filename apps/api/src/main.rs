mod ai_gateway;
mod analysis;
mod config;
mod errors;
mod extract;
mod insights;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_gateway::AiGateway;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::s3_blobs::build_s3_client;
use crate::store::{RecordStore, RedisKv, S3Blobs};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumind API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Redis (record key-value store)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO (uploaded files)
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    let store = RecordStore::new(
        Arc::new(RedisKv::new(redis)),
        Arc::new(S3Blobs::new(s3, config.s3_bucket.clone())),
    );

    // Initialize AI gateway
    let gateway = AiGateway::from_config(&config)?;
    let tiers: Vec<_> = gateway.tiers().iter().map(|t| t.model.as_str()).collect();
    info!("AI gateway initialized (tiers: {})", tiers.join(" -> "));
    if !gateway.is_configured() {
        warn!("GEMINI_API_KEY is not set; every AI request will fail with a configuration error");
    }

    let state = AppState { gateway, store };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
