//! Dashboard routes.
//!
//! GET /users/{user_id}/dashboard - Insights, summary, recommendations and metrics for one user

use axum::extract::Path;
use axum::routing::get;
use axum::{Extension, Json, Router};
use tracing::{info, instrument};

use crate::analytics::dashboard::build_dashboard;
use crate::analytics::recommendations::SharedRecommendationSource;
use crate::db::{read_metrics, read_products, read_sales, AppDb};
use crate::error::ApiResult;
use crate::models::DashboardResponse;

/// Build the dashboard router.
pub fn router() -> Router {
    Router::new().route("/users/{user_id}/dashboard", get(get_dashboard))
}

/// Build the dashboard for a user.
///
/// Reads never fail outward: an unconfigured or failing store yields the
/// all-empty shape with `degraded: true`.
#[instrument(skip_all, fields(user_id = %user_id))]
async fn get_dashboard(
    Extension(store): Extension<AppDb>,
    Extension(source): Extension<SharedRecommendationSource>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<DashboardResponse>> {
    let store = store.as_ref();
    let (products, sales, metrics) = tokio::join!(
        read_products(store, &user_id),
        read_sales(store, &user_id),
        read_metrics(store, &user_id),
    );

    let dashboard = build_dashboard(products, sales, metrics, source.as_ref())?;

    info!(
        "Dashboard for {}: {} insights, {} metrics, degraded={}",
        user_id,
        dashboard.insights.len(),
        dashboard.business_metrics.len(),
        dashboard.degraded
    );

    Ok(Json(dashboard))
}
