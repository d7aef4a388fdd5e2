//! Record store adapter.
//!
//! The service talks to persistence only through [`RecordStore`]: one `create`
//! per ingested entry and `find_by_user_id` reads returning records newest
//! first. The handle is built once in `main` and injected into the router as
//! an axum `Extension`:
//! ```ignore
//! async fn my_handler(
//!     Extension(store): Extension<AppDb>,
//! ) -> impl IntoResponse {
//!     // `None` means no store is configured
//! }
//! ```

pub mod memory;
pub mod postgres;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::StoreError;
use crate::models::{
    Collection, MetricRecord, NewRecord, ProductRecord, SaleRecord, StoredRecord,
};

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

/// Shared handle to the configured store.
pub type SharedStore = Arc<dyn RecordStore>;

/// Router extension carrying the store; `None` when the process has no store.
pub type AppDb = Option<SharedStore>;

/// Optional filter and limit for `find_by_user_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindQuery {
    /// Restrict metric reads to one `metricType`. Ignored for other collections.
    pub metric_type: Option<String>,
    pub limit: Option<usize>,
}

impl FindQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn metric_type(metric_type: impl Into<String>) -> Self {
        Self {
            metric_type: Some(metric_type.into()),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record and return it with its id and timestamps.
    async fn create(&self, record: NewRecord) -> Result<StoredRecord, StoreError>;

    /// All records of `collection` owned by `user_id`, newest first.
    async fn find_by_user_id(
        &self,
        collection: Collection,
        user_id: &str,
        query: &FindQuery,
    ) -> Result<Vec<StoredRecord>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

// ============================================================================
// Timeout and retry at the adapter boundary
// ============================================================================

/// Bounds every store call with a timeout and retries failed reads once.
///
/// Creates are not retried: ingest has no dedup, so a retry after an
/// ambiguous failure could store the entry twice.
pub struct ResilientStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: RecordStore> ResilientStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout.as_millis() as u64))?
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for ResilientStore<S> {
    async fn create(&self, record: NewRecord) -> Result<StoredRecord, StoreError> {
        self.bounded(self.inner.create(record)).await
    }

    async fn find_by_user_id(
        &self,
        collection: Collection,
        user_id: &str,
        query: &FindQuery,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        match self
            .bounded(self.inner.find_by_user_id(collection, user_id, query))
            .await
        {
            Err(e) if e.is_unavailable() => {
                warn!("Retrying {} read for {}: {}", collection.as_str(), user_id, e);
                self.bounded(self.inner.find_by_user_id(collection, user_id, query))
                    .await
            }
            result => result,
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        match self.bounded(self.inner.health_check()).await {
            Err(e) if e.is_unavailable() => {
                warn!("Retrying store health check: {}", e);
                self.bounded(self.inner.health_check()).await
            }
            result => result,
        }
    }
}

// ============================================================================
// Degrading reads
// ============================================================================

/// Result of a read that never fails outward.
///
/// `degraded` is set when the store was absent or the read failed; `data` is
/// then empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOutcome<T> {
    pub data: Vec<T>,
    pub degraded: bool,
}

impl<T> ReadOutcome<T> {
    pub fn ok(data: Vec<T>) -> Self {
        Self {
            data,
            degraded: false,
        }
    }

    pub fn degraded() -> Self {
        Self {
            data: Vec::new(),
            degraded: true,
        }
    }

    pub fn filter_map<U>(self, f: impl FnMut(T) -> Option<U>) -> ReadOutcome<U> {
        ReadOutcome {
            data: self.data.into_iter().filter_map(f).collect(),
            degraded: self.degraded,
        }
    }
}

/// Read a collection, turning an absent store or any failure into an empty,
/// degraded outcome.
pub async fn read_or_degrade(
    store: Option<&SharedStore>,
    collection: Collection,
    user_id: &str,
    query: &FindQuery,
) -> ReadOutcome<StoredRecord> {
    let Some(store) = store else {
        warn!(
            "No record store configured, serving empty {} for {}",
            collection.as_str(),
            user_id
        );
        return ReadOutcome::degraded();
    };

    match store.find_by_user_id(collection, user_id, query).await {
        Ok(records) => ReadOutcome::ok(records),
        Err(e) => {
            warn!(
                "Failed to read {} for {}, serving empty data: {}",
                collection.as_str(),
                user_id,
                e
            );
            ReadOutcome::degraded()
        }
    }
}

pub async fn read_products(store: Option<&SharedStore>, user_id: &str) -> ReadOutcome<ProductRecord> {
    read_or_degrade(store, Collection::Products, user_id, &FindQuery::all())
        .await
        .filter_map(StoredRecord::into_product)
}

pub async fn read_sales(store: Option<&SharedStore>, user_id: &str) -> ReadOutcome<SaleRecord> {
    read_or_degrade(store, Collection::Sales, user_id, &FindQuery::all())
        .await
        .filter_map(StoredRecord::into_sale)
}

pub async fn read_metrics(store: Option<&SharedStore>, user_id: &str) -> ReadOutcome<MetricRecord> {
    read_or_degrade(store, Collection::Metrics, user_id, &FindQuery::all())
        .await
        .filter_map(StoredRecord::into_metric)
}
