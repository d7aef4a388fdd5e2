//! # PostgreSQL Record Store Tests
//!
//! These tests run `PgRecordStore` against a real database. They need
//! PostgreSQL reachable at `APP_DATABASE_URL`; without it each test returns
//! early. Every test writes under a fresh user id, so reruns do not interfere.
//!
//! ## Running Tests
//!
//! ```bash
//! APP_DATABASE_URL=postgres://localhost/insight_dashboard cargo test --test postgres_store
//! ```

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use insight_dashboard::db::{FindQuery, PgRecordStore, RecordStore};
use insight_dashboard::models::{
    Collection, InsightMetadata, NewMetric, NewProduct, NewRecord, StoredRecord,
};

async fn store() -> Option<PgRecordStore> {
    let Ok(url) = std::env::var("APP_DATABASE_URL") else {
        eprintln!("APP_DATABASE_URL not set; skipping PostgreSQL test");
        return None;
    };
    let store = PgRecordStore::connect_lazy(&url, 2).expect("Failed to create pool");
    store.migrate().await.expect("Failed to run migrations");
    Some(store)
}

fn product(user_id: &str, name: &str) -> NewRecord {
    NewRecord::Product(NewProduct {
        user_id: user_id.to_string(),
        product_name: name.to_string(),
        quantity: 4,
        material_cost: 2.5,
        selling_price: 6.0,
        added_date: Utc::now(),
    })
}

fn metric(user_id: &str, metric_type: &str, metadata: Option<InsightMetadata>) -> NewRecord {
    NewRecord::Metric(NewMetric {
        user_id: user_id.to_string(),
        metric_type: metric_type.to_string(),
        value: 0.75,
        date_recorded: Utc::now(),
        product_name: None,
        price: None,
        quantity: None,
        material_cost: None,
        selling_price: None,
        metadata,
    })
}

#[tokio::test]
async fn test_reads_are_newest_first() {
    let Some(store) = store().await else { return };
    let user_id = Uuid::new_v4().to_string();

    let mut created = Vec::new();
    for name in ["first", "second", "third"] {
        let record = store
            .create(product(&user_id, name))
            .await
            .expect("Failed to insert product");
        created.push(record.id());
    }

    let found = store
        .find_by_user_id(Collection::Products, &user_id, &FindQuery::all())
        .await
        .expect("Failed to read products");
    let ids: Vec<Uuid> = found.iter().map(StoredRecord::id).collect();
    created.reverse();
    assert_eq!(ids, created);

    let other = store
        .find_by_user_id(Collection::Products, "someone-else", &FindQuery::all())
        .await
        .expect("Failed to read products");
    assert!(other.iter().all(|r| r.user_id() == "someone-else"));
}

#[tokio::test]
async fn test_metric_metadata_round_trips() {
    let Some(store) = store().await else { return };
    let user_id = Uuid::new_v4().to_string();

    let metadata: InsightMetadata = serde_json::from_value(json!({
        "category": "pricing",
        "priority": "high",
        "actionable": true,
        "tags": ["margin", "q3"],
        "timeframe": "long_term"
    }))
    .expect("Failed to build metadata");

    let created = store
        .create(metric(&user_id, "ai_insight", Some(metadata.clone())))
        .await
        .expect("Failed to insert metric");

    let found = store
        .find_by_user_id(Collection::Metrics, &user_id, &FindQuery::all())
        .await
        .expect("Failed to read metrics");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0], created);

    let StoredRecord::Metric(record) = &found[0] else {
        panic!("Expected a metric record");
    };
    assert_eq!(record.metadata.as_ref(), Some(&metadata));
    assert_eq!(record.product_name, None);
}

#[tokio::test]
async fn test_metric_type_filter_and_limit() {
    let Some(store) = store().await else { return };
    let user_id = Uuid::new_v4().to_string();

    for metric_type in ["revenue", "ai_insight", "revenue"] {
        store
            .create(metric(&user_id, metric_type, None))
            .await
            .expect("Failed to insert metric");
    }

    let all = store
        .find_by_user_id(Collection::Metrics, &user_id, &FindQuery::all())
        .await
        .expect("Failed to read metrics");
    assert_eq!(all.len(), 3);

    let revenue = store
        .find_by_user_id(Collection::Metrics, &user_id, &FindQuery::metric_type("revenue"))
        .await
        .expect("Failed to read metrics");
    assert_eq!(revenue.len(), 2);

    let limited = store
        .find_by_user_id(Collection::Metrics, &user_id, &FindQuery::all().with_limit(1))
        .await
        .expect("Failed to read metrics");
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id(), all[0].id());
}

#[tokio::test]
async fn test_health_check_passes() {
    let Some(store) = store().await else { return };
    store.health_check().await.expect("Health check failed");
}
