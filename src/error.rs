//! Error types for the store seam, the analytics components and the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failures raised by a `RecordStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("record store call timed out after {0} ms")]
    Timeout(u64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored record could not be decoded: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Whether the failure means the store cannot be reached at all.
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::Unavailable(_) | StoreError::Timeout(_) => true,
            StoreError::Database(e) => matches!(
                e,
                sqlx::Error::Io(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Tls(_)
            ),
            StoreError::Corrupt(_) => false,
        }
    }
}

/// Rejections from the metric ingestor.
#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("{} required", join_fields(.0))]
    MissingFields(Vec<&'static str>),
    #[error("value must be numeric, got {0}")]
    InvalidValue(String),
    #[error("request body must be a JSON object")]
    MalformedBody,
}

fn join_fields(fields: &[&str]) -> String {
    match fields {
        [] => String::new(),
        [only] => format!("{} is", only),
        [init @ .., last] => format!("{} and {} are", init.join(", "), last),
    }
}

/// Recommendations that cannot be placed in a timeframe bucket.
#[derive(Debug, Error, PartialEq)]
pub enum BucketError {
    #[error("recommendation {0} has no timeframe")]
    MissingTimeframe(String),
    #[error("recommendation {id} has unknown timeframe {value:?}")]
    UnknownTimeframe { id: String, value: String },
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<IngestError> for ApiError {
    fn from(value: IngestError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        if value.is_unavailable() {
            Self::Unavailable(value.to_string())
        } else {
            Self::Internal(value.to_string())
        }
    }
}

impl From<BucketError> for ApiError {
    fn from(value: BucketError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unavailable(msg) => {
                error!("Record store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Record store is not available".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
