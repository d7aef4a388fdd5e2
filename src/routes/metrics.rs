//! Metric ingestion routes.
//!
//! POST /users/{user_id}/metrics - Add a product, a sale or a generic metric

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::Path;
use axum::routing::post;
use axum::{Extension, Json, Router};
use tracing::instrument;

use crate::analytics::ingest::{ingest, parse_request};
use crate::db::AppDb;
use crate::error::{ApiError, ApiResult};
use crate::models::{AddMetricRequest, ApiResponse, StoredRecord};

/// Build the metrics router.
pub fn router() -> Router {
    Router::new().route("/users/{user_id}/metrics", post(add_metric))
}

/// Store one entry for the user.
///
/// The body is read as JSON whatever its content type. 400 when it is not a
/// JSON object or `metricType` (or `value`, for generic metrics) is missing,
/// 503 when no store is configured or it fails its health check.
#[instrument(skip_all, fields(user_id = %user_id))]
async fn add_metric(
    Extension(store): Extension<AppDb>,
    Path(user_id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<ApiResponse<StoredRecord>>> {
    let body = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let req: AddMetricRequest = parse_request(&body)?;
    let stored = ingest(store.as_deref(), &user_id, req).await?;

    Ok(Json(ApiResponse {
        success: true,
        message: format!("{} entry added successfully", stored.collection().as_str()),
        data: stored,
    }))
}
