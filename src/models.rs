//! Domain models for the insight dashboard service.
//!
//! Stored records map to the three logical collections (products, sales,
//! metrics). Every record is owned by exactly one user and carries the two
//! store-assigned timestamps. Derived views (insights, summaries,
//! recommendation buckets) are recomputed on every read and never stored.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analytics::financials::StockStatus;

// ============================================================================
// Enumerations
// ============================================================================

/// Logical collection a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Sales,
    Metrics,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Sales => "sales",
            Collection::Metrics => "metrics",
        }
    }
}

/// Three-level rating used for insight priority and estimated impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

/// Urgency bucket for insights and recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Immediate,
    ShortTerm,
    LongTerm,
}

impl Timeframe {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "immediate" => Some(Timeframe::Immediate),
            "short_term" => Some(Timeframe::ShortTerm),
            "long_term" => Some(Timeframe::LongTerm),
            _ => None,
        }
    }
}

// ============================================================================
// Stored Records
// ============================================================================

/// Insight-relevant metadata attached to a metric record.
///
/// Decoding is lenient: a field holding a value of the wrong shape reads as
/// absent instead of rejecting the whole record, so the insight defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightMetadata {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Level>,
    #[serde(default, deserialize_with = "truthy", skip_serializing_if = "Option::is_none")]
    pub actionable: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "string_list", skip_serializing_if = "Option::is_none")]
    pub suggested_actions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub estimated_impact: Option<Level>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<Timeframe>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub insight_id: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A generic numeric metric, including AI-tagged insight records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub id: Uuid,
    pub user_id: String,
    pub metric_type: String,
    pub value: f64,
    pub date_recorded: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<InsightMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MetricRecord {
    pub const AI_INSIGHT: &'static str = "ai_insight";

    pub fn is_insight(&self) -> bool {
        self.metric_type == Self::AI_INSIGHT
    }
}

/// An inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: Uuid,
    pub user_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub material_cost: f64,
    pub selling_price: f64,
    pub added_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single sale.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: Uuid,
    pub user_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price_per_unit: f64,
    pub sale_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A record as returned by the store: generated id, input fields and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredRecord {
    Product(ProductRecord),
    Sale(SaleRecord),
    Metric(MetricRecord),
}

impl StoredRecord {
    pub fn id(&self) -> Uuid {
        match self {
            StoredRecord::Product(r) => r.id,
            StoredRecord::Sale(r) => r.id,
            StoredRecord::Metric(r) => r.id,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            StoredRecord::Product(r) => &r.user_id,
            StoredRecord::Sale(r) => &r.user_id,
            StoredRecord::Metric(r) => &r.user_id,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            StoredRecord::Product(_) => Collection::Products,
            StoredRecord::Sale(_) => Collection::Sales,
            StoredRecord::Metric(_) => Collection::Metrics,
        }
    }

    pub fn into_product(self) -> Option<ProductRecord> {
        match self {
            StoredRecord::Product(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_sale(self) -> Option<SaleRecord> {
        match self {
            StoredRecord::Sale(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_metric(self) -> Option<MetricRecord> {
        match self {
            StoredRecord::Metric(r) => Some(r),
            _ => None,
        }
    }
}

// ============================================================================
// Records To Be Created
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub user_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub material_cost: f64,
    pub selling_price: f64,
    pub added_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub user_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price_per_unit: f64,
    pub sale_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMetric {
    pub user_id: String,
    pub metric_type: String,
    pub value: f64,
    pub date_recorded: DateTime<Utc>,
    pub product_name: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub material_cost: Option<f64>,
    pub selling_price: Option<f64>,
    pub metadata: Option<InsightMetadata>,
}

/// A validated entry routed to exactly one collection.
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    Product(NewProduct),
    Sale(NewSale),
    Metric(NewMetric),
}

impl NewRecord {
    pub fn collection(&self) -> Collection {
        match self {
            NewRecord::Product(_) => Collection::Products,
            NewRecord::Sale(_) => Collection::Sales,
            NewRecord::Metric(_) => Collection::Metrics,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            NewRecord::Product(p) => &p.user_id,
            NewRecord::Sale(s) => &s.user_id,
            NewRecord::Metric(m) => &m.user_id,
        }
    }

    /// Materialize the record with a store-assigned id and timestamps.
    pub fn into_stored(self, id: Uuid, now: DateTime<Utc>) -> StoredRecord {
        match self {
            NewRecord::Product(p) => StoredRecord::Product(ProductRecord {
                id,
                user_id: p.user_id,
                product_name: p.product_name,
                quantity: p.quantity,
                material_cost: p.material_cost,
                selling_price: p.selling_price,
                added_date: p.added_date,
                created_at: now,
                updated_at: now,
            }),
            NewRecord::Sale(s) => StoredRecord::Sale(SaleRecord {
                id,
                user_id: s.user_id,
                product_name: s.product_name,
                quantity: s.quantity,
                price_per_unit: s.price_per_unit,
                sale_date: s.sale_date,
                created_at: now,
                updated_at: now,
            }),
            NewRecord::Metric(m) => StoredRecord::Metric(MetricRecord {
                id,
                user_id: m.user_id,
                metric_type: m.metric_type,
                value: m.value,
                date_recorded: m.date_recorded,
                product_name: m.product_name,
                price: m.price,
                quantity: m.quantity,
                material_cost: m.material_cost,
                selling_price: m.selling_price,
                metadata: m.metadata,
                created_at: now,
                updated_at: now,
            }),
        }
    }
}

// ============================================================================
// Derived Views
// ============================================================================

/// A normalized, user-facing analytics item derived from an ai_insight record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub priority: Level,
    pub date: DateTime<Utc>,
    pub actionable: bool,
    pub category: String,
    pub confidence: f64,
    pub source: String,
    pub tags: Vec<String>,
    pub suggested_actions: Vec<String>,
    pub estimated_impact: Level,
    pub timeframe: Timeframe,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_insights: usize,
    pub high_priority_count: usize,
    pub actionable_count: usize,
    pub weekly_growth: f64,
    pub top_categories: Vec<String>,
}

/// An actionable suggestion. `timeframe` arrives as produced and is only
/// validated when the recommendation is bucketed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Level>,
    #[serde(default)]
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationBuckets {
    pub immediate: Vec<Recommendation>,
    pub short_term: Vec<Recommendation>,
    pub long_term: Vec<Recommendation>,
}

// ============================================================================
// Request Models (Deserialize from JSON input)
// ============================================================================

/// Request body for adding a metric, product or sale.
///
/// Every field is kept as raw JSON and coerced by the ingestor, so a field of
/// an unexpected type never fails decoding of the whole body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMetricRequest {
    pub metric_type: Option<Value>,
    pub value: Option<Value>,
    pub date: Option<Value>,
    pub product_name: Option<Value>,
    pub price: Option<Value>,
    pub quantity: Option<Value>,
    pub material_cost: Option<Value>,
    pub selling_price: Option<Value>,
    pub metadata: Option<Value>,
}

// ============================================================================
// Response Models
// ============================================================================

/// Generic API response wrapper for writes.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: usize,
    pub inventory_value: f64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales: usize,
    pub total_revenue: f64,
}

/// Combined dashboard view for one user.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub insights: Vec<Insight>,
    pub summary: DashboardSummary,
    pub recommendations: RecommendationBuckets,
    pub business_metrics: Vec<MetricRecord>,
    pub inventory: InventorySummary,
    pub sales: SalesSummary,
    pub degraded: bool,
}

/// Product as presented to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub date_added: DateTime<Utc>,
    pub material_cost: f64,
    pub selling_price: f64,
    pub profit_margin: f64,
    pub stock_status: StockStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<ProductView>,
    pub inventory_value: f64,
    pub degraded: bool,
}

/// Sale as presented to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleView {
    pub id: Uuid,
    pub product_name: String,
    pub quantity: i64,
    pub price_per_unit: f64,
    pub total: f64,
    pub sale_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesResponse {
    pub success: bool,
    pub sales: Vec<SaleView>,
    pub total_revenue: f64,
    pub degraded: bool,
}

// ============================================================================
// Lenient field decoding
// ============================================================================

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).ok())
}

fn truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Null => None,
        Value::Bool(b) => Some(b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan())),
        Value::String(s) => Some(!s.is_empty()),
        Value::Array(_) | Value::Object(_) => Some(true),
    })
}

fn string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}
