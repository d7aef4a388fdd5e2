//! # Insight Dashboard Library
//!
//! Exposes the Axum router and modules so integration tests can create
//! an in-process server without requiring `cargo run` in another terminal.

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::analytics::recommendations::{NoRecommendations, SharedRecommendationSource};
use crate::db::AppDb;

/// Build the Axum router with all route modules and middleware.
///
/// The caller owns the store handle; pass `None` to run without one. This
/// function does NOT start a server or run migrations.
pub fn create_app(store: AppDb) -> Router {
    create_app_with_source(store, Arc::new(NoRecommendations))
}

/// Like [`create_app`], with an explicit recommendation source.
pub fn create_app_with_source(store: AppDb, source: SharedRecommendationSource) -> Router {
    Router::new()
        .merge(routes::dashboard::router())
        .merge(routes::metrics::router())
        .merge(routes::products::router())
        .merge(routes::sales::router())
        .merge(routes::health::router())
        .layer(Extension(store))
        .layer(Extension(source))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
