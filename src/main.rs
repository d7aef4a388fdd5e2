//! # Insight Dashboard Service
//!
//! Ingests per-user business records (products, sales, generic metrics and
//! AI-tagged insight records) and serves the views derived from them.
//!
//! ## Endpoints
//!
//! - `GET  /users/{user_id}/dashboard` - insights, summary, recommendations, metrics
//! - `POST /users/{user_id}/metrics`   - add a product, sale or metric
//! - `GET  /users/{user_id}/products`  - products with margin and stock status
//! - `GET  /users/{user_id}/sales`     - sales with revenue totals
//! - `GET  /health`                    - liveness and store state
//!
//! ## Architecture
//!
//! - Axum handles HTTP routing and request/response lifecycle
//! - The record store (PostgreSQL via SQLx, or in-memory) is built once here
//!   and injected into the router
//! - Derivation logic in `analytics` is pure and store-agnostic

use std::sync::Arc;

use tracing::{info, warn};

use insight_dashboard::config::{AppConfig, StoreBackend};
use insight_dashboard::create_app;
use insight_dashboard::db::{AppDb, MemoryRecordStore, PgRecordStore, ResilientStore, SharedStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insight_dashboard=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting insight dashboard service");

    let config = AppConfig::from_env();
    let store = build_store(&config).await?;

    let app = create_app(store);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_store(config: &AppConfig) -> anyhow::Result<AppDb> {
    let store: SharedStore = match &config.backend {
        StoreBackend::Unconfigured => {
            warn!("APP_DATABASE_URL not set; dashboards will be empty and writes will return 503");
            return Ok(None);
        }
        StoreBackend::Memory => {
            info!("Using in-memory record store");
            Arc::new(ResilientStore::new(
                MemoryRecordStore::new(),
                config.store_timeout,
            ))
        }
        StoreBackend::Postgres(url) => {
            let pg = PgRecordStore::connect_lazy(url, config.max_connections)?;
            info!("Record store pool created");

            // An unreachable database should not stop the service; reads
            // degrade and writes report 503 until it comes back.
            if let Err(e) = pg.migrate().await {
                warn!("Record store migrations failed: {}", e);
            }
            Arc::new(ResilientStore::new(pg, config.store_timeout))
        }
    };

    Ok(Some(store))
}
