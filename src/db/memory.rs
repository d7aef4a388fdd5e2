//! Process-local record store.
//!
//! Used by the test suite and by `APP_STORE=memory` for local runs.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{FindQuery, RecordStore};
use crate::error::StoreError;
use crate::models::{Collection, NewRecord, StoredRecord};

#[derive(Default)]
pub struct MemoryRecordStore {
    // Insertion order; reads walk it backwards to get newest first.
    records: RwLock<Vec<StoredRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_query(record: &StoredRecord, query: &FindQuery) -> bool {
    match (record, &query.metric_type) {
        (StoredRecord::Metric(metric), Some(wanted)) => &metric.metric_type == wanted,
        _ => true,
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, record: NewRecord) -> Result<StoredRecord, StoreError> {
        let stored = record.into_stored(Uuid::new_v4(), Utc::now());
        debug!(
            "Stored {} record {} in memory",
            stored.collection().as_str(),
            stored.id()
        );
        self.records.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_user_id(
        &self,
        collection: Collection,
        user_id: &str,
        query: &FindQuery,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        let records = self.records.read().await;
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.collection() == collection && r.user_id() == user_id)
            .filter(|r| matches_query(r, query))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
