//! GET /health - Liveness plus record store state

use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use tracing::warn;

use crate::db::AppDb;

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health(Extension(store): Extension<AppDb>) -> Json<Value> {
    let store_state = match store {
        None => "unconfigured",
        Some(store) => match store.health_check().await {
            Ok(()) => "configured",
            Err(e) => {
                warn!("Record store health check failed: {}", e);
                "unavailable"
            }
        },
    };

    Json(json!({ "status": "ok", "store": store_state }))
}
