//! PostgreSQL record store.
//!
//! Each collection is its own table (see `migrations/`). Ids are generated
//! here, timestamps default in the database. A `seq` column breaks ties
//! between rows created in the same instant so reads stay newest first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{FindQuery, RecordStore};
use crate::error::StoreError;
use crate::models::{
    Collection, InsightMetadata, MetricRecord, NewRecord, ProductRecord, SaleRecord, StoredRecord,
};

pub struct PgRecordStore {
    pool: PgPool,
}

/// Row shape of the `metrics` table; metadata lives in a JSONB column.
#[derive(Debug, sqlx::FromRow)]
struct MetricRow {
    id: Uuid,
    user_id: String,
    metric_type: String,
    value: f64,
    date_recorded: DateTime<Utc>,
    product_name: Option<String>,
    price: Option<f64>,
    quantity: Option<i64>,
    material_cost: Option<f64>,
    selling_price: Option<f64>,
    metadata: Option<Json<InsightMetadata>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MetricRow> for MetricRecord {
    fn from(row: MetricRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            metric_type: row.metric_type,
            value: row.value,
            date_recorded: row.date_recorded,
            product_name: row.product_name,
            price: row.price,
            quantity: row.quantity,
            material_cost: row.material_cost,
            selling_price: row.selling_price,
            metadata: row.metadata.map(|Json(meta)| meta),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, user_id, product_name, quantity, material_cost, selling_price, added_date, created_at, updated_at";
const SALE_COLUMNS: &str =
    "id, user_id, product_name, quantity, price_per_unit, sale_date, created_at, updated_at";
const METRIC_COLUMNS: &str = "id, user_id, metric_type, value, date_recorded, product_name, price, \
     quantity, material_cost, selling_price, metadata, created_at, updated_at";

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a store on a lazily connected pool. Connection errors surface on
    /// first use rather than here.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)?;
        Ok(Self::new(pool))
    }

    /// Apply the schema in `migrations/`.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        info!("Record store migrations complete");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create(&self, record: NewRecord) -> Result<StoredRecord, StoreError> {
        let id = Uuid::new_v4();
        let stored = match record {
            NewRecord::Product(p) => {
                let row: ProductRecord = sqlx::query_as(&format!(
                    r#"
                    INSERT INTO products (id, user_id, product_name, quantity, material_cost, selling_price, added_date)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING {PRODUCT_COLUMNS}
                    "#
                ))
                .bind(id)
                .bind(&p.user_id)
                .bind(&p.product_name)
                .bind(p.quantity)
                .bind(p.material_cost)
                .bind(p.selling_price)
                .bind(p.added_date)
                .fetch_one(&self.pool)
                .await?;
                StoredRecord::Product(row)
            }
            NewRecord::Sale(s) => {
                let row: SaleRecord = sqlx::query_as(&format!(
                    r#"
                    INSERT INTO sales (id, user_id, product_name, quantity, price_per_unit, sale_date)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING {SALE_COLUMNS}
                    "#
                ))
                .bind(id)
                .bind(&s.user_id)
                .bind(&s.product_name)
                .bind(s.quantity)
                .bind(s.price_per_unit)
                .bind(s.sale_date)
                .fetch_one(&self.pool)
                .await?;
                StoredRecord::Sale(row)
            }
            NewRecord::Metric(m) => {
                let row: MetricRow = sqlx::query_as(&format!(
                    r#"
                    INSERT INTO metrics (id, user_id, metric_type, value, date_recorded, product_name,
                                         price, quantity, material_cost, selling_price, metadata)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    RETURNING {METRIC_COLUMNS}
                    "#
                ))
                .bind(id)
                .bind(&m.user_id)
                .bind(&m.metric_type)
                .bind(m.value)
                .bind(m.date_recorded)
                .bind(&m.product_name)
                .bind(m.price)
                .bind(m.quantity)
                .bind(m.material_cost)
                .bind(m.selling_price)
                .bind(m.metadata.map(Json))
                .fetch_one(&self.pool)
                .await?;
                StoredRecord::Metric(row.into())
            }
        };

        debug!("Inserted {} record {}", stored.collection().as_str(), stored.id());
        Ok(stored)
    }

    async fn find_by_user_id(
        &self,
        collection: Collection,
        user_id: &str,
        query: &FindQuery,
    ) -> Result<Vec<StoredRecord>, StoreError> {
        // LIMIT NULL means no limit in PostgreSQL.
        let limit = query.limit.map(|l| l as i64);

        let records = match collection {
            Collection::Products => sqlx::query_as::<_, ProductRecord>(&format!(
                r#"
                SELECT {PRODUCT_COLUMNS} FROM products
                WHERE user_id = $1
                ORDER BY created_at DESC, seq DESC
                LIMIT $2
                "#
            ))
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(StoredRecord::Product)
            .collect(),
            Collection::Sales => sqlx::query_as::<_, SaleRecord>(&format!(
                r#"
                SELECT {SALE_COLUMNS} FROM sales
                WHERE user_id = $1
                ORDER BY created_at DESC, seq DESC
                LIMIT $2
                "#
            ))
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(StoredRecord::Sale)
            .collect(),
            Collection::Metrics => sqlx::query_as::<_, MetricRow>(&format!(
                r#"
                SELECT {METRIC_COLUMNS} FROM metrics
                WHERE user_id = $1 AND ($2::TEXT IS NULL OR metric_type = $2)
                ORDER BY created_at DESC, seq DESC
                LIMIT $3
                "#
            ))
            .bind(user_id)
            .bind(&query.metric_type)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| StoredRecord::Metric(row.into()))
            .collect(),
        };

        Ok(records)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
