//! # Dashboard Assembly
//!
//! Combines the three per-user reads into one response:
//!
//! 1. Aggregation and insight extraction over the metric records
//! 2. Recommendations from the configured source, bucketed by timeframe
//! 3. Derived financials over the product and sale records
//!
//! The reads are independent and not transactional. Any of them may have
//! degraded to empty data; the response is still built and `degraded` is set.

use crate::analytics::recommendations::{bucket, RecommendationSource};
use crate::analytics::{aggregation, financials, insights};
use crate::db::ReadOutcome;
use crate::error::BucketError;
use crate::models::{DashboardResponse, MetricRecord, ProductRecord, SaleRecord};

pub fn build_dashboard(
    products: ReadOutcome<ProductRecord>,
    sales: ReadOutcome<SaleRecord>,
    metrics: ReadOutcome<MetricRecord>,
    source: &dyn RecommendationSource,
) -> Result<DashboardResponse, BucketError> {
    let degraded = products.degraded || sales.degraded || metrics.degraded;

    let summary = aggregation::summarize(&metrics.data);
    let insights = insights::extract_insights(&metrics.data);
    let recommendations = bucket(source.recommend(&insights))?;

    Ok(DashboardResponse {
        insights,
        summary,
        recommendations,
        business_metrics: metrics.data,
        inventory: financials::inventory_summary(&products.data),
        sales: financials::sales_summary(&sales.data),
        degraded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::analytics::recommendations::NoRecommendations;
    use crate::models::{InsightMetadata, Recommendation};

    fn metric(metric_type: &str, category: &str) -> MetricRecord {
        let now = Utc::now();
        MetricRecord {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            metric_type: metric_type.into(),
            value: 0.6,
            date_recorded: now,
            product_name: None,
            price: None,
            quantity: None,
            material_cost: None,
            selling_price: None,
            metadata: Some(InsightMetadata {
                category: Some(category.into()),
                ..Default::default()
            }),
            created_at: now,
            updated_at: now,
        }
    }

    fn product(quantity: i64) -> ProductRecord {
        let now = Utc::now();
        ProductRecord {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            product_name: "Lamp".into(),
            quantity,
            material_cost: 4.0,
            selling_price: 10.0,
            added_date: now,
            created_at: now,
            updated_at: now,
        }
    }

    struct FixedSource(Vec<Recommendation>);

    impl RecommendationSource for FixedSource {
        fn recommend(&self, _insights: &[crate::models::Insight]) -> Vec<Recommendation> {
            self.0.clone()
        }
    }

    #[test]
    fn all_degraded_reads_give_empty_dashboard() {
        let dashboard = build_dashboard(
            ReadOutcome::degraded(),
            ReadOutcome::degraded(),
            ReadOutcome::degraded(),
            &NoRecommendations,
        )
        .unwrap();

        assert!(dashboard.degraded);
        assert!(dashboard.insights.is_empty());
        assert!(dashboard.business_metrics.is_empty());
        assert_eq!(dashboard.summary.total_insights, 0);
        assert_eq!(dashboard.inventory.inventory_value, 0.0);
    }

    #[test]
    fn partial_snapshot_is_flagged() {
        let dashboard = build_dashboard(
            ReadOutcome::ok(vec![product(2), product(0)]),
            ReadOutcome::degraded(),
            ReadOutcome::ok(vec![metric("ai_insight", "pricing"), metric("revenue", "x")]),
            &NoRecommendations,
        )
        .unwrap();

        assert!(dashboard.degraded);
        assert_eq!(dashboard.insights.len(), 1);
        assert_eq!(dashboard.business_metrics.len(), 2);
        assert_eq!(dashboard.summary.top_categories, vec!["pricing"]);
        assert_eq!(dashboard.inventory.total_products, 2);
        assert_eq!(dashboard.inventory.low_stock_count, 1);
        assert_eq!(dashboard.inventory.out_of_stock_count, 1);
        assert_eq!(dashboard.inventory.inventory_value, 8.0);
        assert_eq!(dashboard.sales.total_sales, 0);
    }

    #[test]
    fn recommendations_from_source_are_bucketed() {
        let source = FixedSource(vec![Recommendation {
            id: "r1".into(),
            title: "Reorder lamps".into(),
            description: String::new(),
            category: Some("inventory".into()),
            priority: None,
            timeframe: Some("immediate".into()),
        }]);

        let dashboard = build_dashboard(
            ReadOutcome::ok(Vec::new()),
            ReadOutcome::ok(Vec::new()),
            ReadOutcome::ok(Vec::new()),
            &source,
        )
        .unwrap();

        assert!(!dashboard.degraded);
        assert_eq!(dashboard.recommendations.immediate.len(), 1);
    }
}
