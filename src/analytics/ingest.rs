//! # Metric Ingestion
//!
//! Validates an "add metric" request and routes it to exactly one collection:
//!
//! 1. `metricType == "products"` → product record
//! 2. `metricType == "sales"` → sale record (`price` becomes `pricePerUnit`)
//! 3. anything else → generic metric record; `value` is required here only
//!
//! Numeric inputs arrive as JSON numbers or strings. Strings are read by their
//! longest numeric prefix (`"12abc"` is 12); anything unreadable becomes 0,
//! except the generic metric `value`, which must be numeric. Integers out of
//! `i64` range saturate. `metricType` is compared exactly, without trimming,
//! and a non-string `metricType` or `productName` is stored by its text form.
//!
//! Every call creates a new record. There is no dedup or update path.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use tracing::info;

use crate::db::RecordStore;
use crate::error::{ApiError, IngestError};
use crate::models::{
    AddMetricRequest, InsightMetadata, NewMetric, NewProduct, NewRecord, NewSale, StoredRecord,
};

/// Destination of an entry, decided by its `metricType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind<'a> {
    Product,
    Sale,
    GenericMetric(&'a str),
}

impl<'a> EntryKind<'a> {
    pub fn classify(metric_type: &'a str) -> Self {
        match metric_type {
            "products" => EntryKind::Product,
            "sales" => EntryKind::Sale,
            other => EntryKind::GenericMetric(other),
        }
    }
}

/// Decode a raw request body. An empty body reads as an empty request so that
/// validation can name the missing fields.
pub fn parse_request(body: &[u8]) -> Result<AddMetricRequest, IngestError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AddMetricRequest::default());
    }
    match serde_json::from_slice(body) {
        Ok(raw @ Value::Object(_)) => {
            serde_json::from_value(raw).map_err(|_| IngestError::MalformedBody)
        }
        _ => Err(IngestError::MalformedBody),
    }
}

/// Validate and coerce a request into the record to store.
pub fn build_entry(
    user_id: &str,
    req: AddMetricRequest,
    now: DateTime<Utc>,
) -> Result<NewRecord, IngestError> {
    let metric_type = req.metric_type.as_ref().and_then(metric_type_of);
    let kind = metric_type.as_deref().map(EntryKind::classify);
    let value = req.value.as_ref().filter(|v| !v.is_null());

    let mut missing = Vec::new();
    if user_id.trim().is_empty() {
        missing.push("userId");
    }
    if kind.is_none() {
        missing.push("metricType");
    }
    if value.is_none() && matches!(kind, None | Some(EntryKind::GenericMetric(_))) {
        missing.push("value");
    }
    let Some(kind) = kind.filter(|_| missing.is_empty()) else {
        return Err(IngestError::MissingFields(missing));
    };

    let date = req.date.as_ref().and_then(coerce_date).unwrap_or(now);

    let entry = match kind {
        EntryKind::Product => NewRecord::Product(NewProduct {
            user_id: user_id.to_string(),
            product_name: req.product_name.as_ref().and_then(loose_text).unwrap_or_default(),
            quantity: int_or_zero(req.quantity.as_ref()),
            material_cost: float_or_zero(req.material_cost.as_ref()),
            selling_price: float_or_zero(req.selling_price.as_ref()),
            added_date: date,
        }),
        EntryKind::Sale => NewRecord::Sale(NewSale {
            user_id: user_id.to_string(),
            product_name: req.product_name.as_ref().and_then(loose_text).unwrap_or_default(),
            quantity: int_or_zero(req.quantity.as_ref()),
            price_per_unit: float_or_zero(req.price.as_ref()),
            sale_date: date,
        }),
        EntryKind::GenericMetric(metric_type) => {
            // Presence was checked above.
            let raw = value.cloned().unwrap_or(Value::Null);
            let value = parse_float(&raw).ok_or_else(|| IngestError::InvalidValue(raw.to_string()))?;
            NewRecord::Metric(NewMetric {
                user_id: user_id.to_string(),
                metric_type: metric_type.to_string(),
                value,
                date_recorded: date,
                product_name: req.product_name.as_ref().and_then(loose_text),
                price: req.price.as_ref().map(|v| float_or_zero(Some(v))),
                quantity: req.quantity.as_ref().map(|v| int_or_zero(Some(v))),
                material_cost: req.material_cost.as_ref().map(|v| float_or_zero(Some(v))),
                selling_price: req.selling_price.as_ref().map(|v| float_or_zero(Some(v))),
                metadata: req.metadata.and_then(metadata_of),
            })
        }
    };

    Ok(entry)
}

/// Validate, route and store one entry.
///
/// Validation runs first, so a bad request is rejected even when the store
/// is down. An absent store or a failed health check is `Unavailable`.
pub async fn ingest(
    store: Option<&dyn RecordStore>,
    user_id: &str,
    req: AddMetricRequest,
) -> Result<StoredRecord, ApiError> {
    let entry = build_entry(user_id, req, Utc::now())?;
    let store =
        store.ok_or_else(|| ApiError::Unavailable("no record store configured".to_string()))?;
    store
        .health_check()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;

    let collection = entry.collection();
    let stored = store.create(entry).await?;

    info!(
        "Stored {} record {} for user {}",
        collection.as_str(),
        stored.id(),
        user_id
    );
    Ok(stored)
}

// ============================================================================
// Coercion
// ============================================================================

/// A `metricType` counts as present when it is truthy: `""`, `0`, `false`,
/// arrays and objects do not name a type.
fn metric_type_of(raw: &Value) -> Option<String> {
    match raw {
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Bool(false) => None,
        other => loose_text(other).filter(|t| !t.is_empty()),
    }
}

/// Text form of a scalar; `None` for null, arrays and objects.
fn loose_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Metadata that is not an object is dropped; the insight defaults apply.
fn metadata_of(raw: Value) -> Option<InsightMetadata> {
    match raw {
        Value::Object(_) => serde_json::from_value(raw).ok(),
        _ => None,
    }
}

fn int_or_zero(raw: Option<&Value>) -> i64 {
    raw.and_then(parse_int).unwrap_or(0)
}

fn float_or_zero(raw: Option<&Value>) -> f64 {
    raw.and_then(parse_float).unwrap_or(0.0)
}

/// Integer reading of a number or numeric string, truncating toward zero.
/// Values beyond the `i64` range saturate.
pub fn parse_int(raw: &Value) -> Option<i64> {
    match raw {
        // `as` saturates out-of-range floats.
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => numeric_prefix(s, false).map(|p| {
            p.parse().unwrap_or(if p.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            })
        }),
        _ => None,
    }
}

/// Float reading of a number or numeric string.
pub fn parse_float(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => numeric_prefix(s, true).and_then(|p| p.parse().ok()),
        _ => None,
    }
}

/// Longest leading numeric literal after optional whitespace and sign.
fn numeric_prefix(s: &str, fractional: bool) -> Option<&str> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if fractional {
        if bytes.get(end) == Some(&b'.') {
            let frac_start = end + 1;
            let mut frac_end = frac_start;
            while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
                frac_end += 1;
            }
            digits += frac_end - frac_start;
            if digits > 0 {
                end = frac_end;
            }
        }
        if digits > 0 && matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
            let mut exp_end = end + 1;
            if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
                exp_end += 1;
            }
            let exp_digits_start = exp_end;
            while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
                exp_end += 1;
            }
            if exp_end > exp_digits_start {
                end = exp_end;
            }
        }
    }

    (digits > 0).then(|| &s[..end])
}

/// RFC 3339 timestamp, `YYYY-MM-DD` date, or epoch milliseconds.
fn coerce_date(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|d| d.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|d| Utc.from_utc_datetime(&d))
                })
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}
